//! Exercise and submission discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plgrade_core::{Assignment, Test};
use plgrade_parser::load_tests;
use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::{GradeError, GradeResult, NamingScheme};

/// Name given to submissions whose folder does not follow the naming scheme.
pub const INVALID_FOLDER_NAME: &str = "INVALID_FOLDER_NAME";

const TESTS_FILE: &str = "tests.txt";
const ABOLISH_FILE: &str = "abolish.txt";
const PRE_FILE: &str = "pre.pl";
const DATABASE_FILE: &str = "database.pl";
const SOURCE_EXTENSIONS: &[&str] = &["pl", "pro"];

/// One exercise: its identifier and the test suite run against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub test: Test,
}

/// Load every exercise under `tests_dir`, ordered by directory name.
///
/// Directories starting with `_` or lacking a `tests.txt` are ignored.
pub fn load_exercises(tests_dir: &Path) -> GradeResult<Vec<Exercise>> {
    let mut exercises = Vec::new();

    for dir in subdirectories(tests_dir)? {
        let Some(name) = dir_name(&dir) else { continue };
        if name.starts_with('_') {
            debug!("Skipping exercise directory {}", dir.display());
            continue;
        }

        let tests_file = dir.join(TESTS_FILE);
        if !tests_file.is_file() {
            debug!("No {} in {}, skipping", TESTS_FILE, dir.display());
            continue;
        }

        let mut test = Test::new(load_tests(&tests_file)?);
        if let Some(abolish) = read_optional(&dir.join(ABOLISH_FILE))? {
            test.abolish = parse_abolish(&abolish);
        }
        if let Some(pre) = read_optional(&dir.join(PRE_FILE))? {
            test.pre = pre;
        }
        if let Some(database) = read_optional(&dir.join(DATABASE_FILE))? {
            test.database = database;
        }

        info!("Loaded exercise {} ({} test cases)", name, test.case_count());
        exercises.push(Exercise { name, test });
    }

    Ok(exercises)
}

/// Split a comma-separated list of predicate indicators.
pub fn parse_abolish(source: &str) -> Vec<String> {
    source
        .split(',')
        .map(str::trim)
        .filter(|pi| !pi.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load every submission under `assignments_dir`, ordered by folder name.
///
/// Submissions without any knowledge files are skipped with a warning.
pub fn load_assignments(assignments_dir: &Path, naming: NamingScheme) -> GradeResult<Vec<Assignment>> {
    let mut assignments: Vec<Assignment> = Vec::new();

    for dir in subdirectories(assignments_dir)? {
        let Some(folder) = dir_name(&dir) else { continue };
        let name = submitter_name(&folder, naming);

        let knowledge = collect_knowledge(&dir)?;
        if knowledge.trim().is_empty() {
            warn!("No knowledge files found for {} in {}, skipping", name, dir.display());
            continue;
        }

        if assignments.iter().any(|a| a.name == name) {
            warn!("Submitter name {} appears more than once ({})", name, dir.display());
        }
        debug!("Found submission {} in {}", name, dir.display());
        assignments.push(Assignment::new(name, dir, strip_comments(&knowledge)));
    }

    Ok(assignments)
}

/// Extract the submitter name from a submission folder name.
pub fn submitter_name(folder: &str, naming: NamingScheme) -> String {
    match naming {
        NamingScheme::Brightspace => {
            let parts: Vec<&str> = folder.split('-').collect();
            if parts.len() > 3 {
                format!("{}_{}", parts[2].trim(), parts[3].trim())
            } else {
                INVALID_FOLDER_NAME.to_string()
            }
        }
        NamingScheme::Blackboard => {
            let Some(start) = folder.find("Group") else {
                return INVALID_FOLDER_NAME.to_string();
            };
            let rest = &folder[start..];
            let group = rest.find('_').map_or(rest, |end| &rest[..end]);
            group.replace(' ', "_").to_lowercase()
        }
    }
}

/// Blank out comment forms the evaluator would misread as operators.
pub fn strip_comments(knowledge: &str) -> String {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [r"(?m)^%.*", r"(?m)^//.*", r"(?m)^/\*.*\*/", r"(?m)^/.*/"]
            .iter()
            .map(|p| Regex::new(p).expect("static comment pattern"))
            .collect()
    });

    patterns.iter().fold(knowledge.to_string(), |text, re| {
        re.replace_all(&text, "").into_owned()
    })
}

/// Concatenate every knowledge file under `dir`, each followed by a newline.
fn collect_knowledge(dir: &Path) -> GradeResult<String> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();

    let mut knowledge = String::new();
    for file in files {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if ext.eq_ignore_ascii_case("zip") {
            warn!("Archive {} is not extracted; unpack it to grade its contents", file.display());
            continue;
        }
        if !SOURCE_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)) {
            continue;
        }

        debug!("Reading knowledge file {}", file.display());
        knowledge.push_str(&read_lossy(&file)?);
        knowledge.push('\n');
    }
    Ok(knowledge)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> GradeResult<()> {
    for entry in fs::read_dir(dir).map_err(GradeError::io(dir))? {
        let path = entry.map_err(GradeError::io(dir))?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn subdirectories(dir: &Path) -> GradeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GradeError::missing_directory(dir));
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(GradeError::io(dir))? {
        let path = entry.map_err(GradeError::io(dir))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn read_lossy(path: &Path) -> GradeResult<String> {
    let bytes = fs::read(path).map_err(GradeError::io(path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_optional(path: &Path) -> GradeResult<Option<String>> {
    if path.is_file() {
        read_lossy(path).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_brightspace_names() {
        assert_eq!(
            submitter_name("12345-678 - Lab Group - 12 - Mar 3, 2024", NamingScheme::Brightspace),
            "Lab Group_12"
        );
        assert_eq!(submitter_name("just-a-name", NamingScheme::Brightspace), INVALID_FOLDER_NAME);
    }

    #[test]
    fn test_blackboard_names() {
        assert_eq!(
            submitter_name("Assignment 1_Group 12_attempt_2024", NamingScheme::Blackboard),
            "group_12"
        );
        assert_eq!(submitter_name("Prefix_Group 7", NamingScheme::Blackboard), "group_7");
        assert_eq!(submitter_name("no group here", NamingScheme::Blackboard), INVALID_FOLDER_NAME);
    }

    #[test]
    fn test_strip_comments() {
        let source = "% header\nfoo(a).\n// c-style\n/* block */\nbar(b). % trailing\n";
        assert_eq!(strip_comments(source), "\nfoo(a).\n\n\nbar(b). % trailing\n");
    }

    #[test]
    fn test_parse_abolish() {
        assert_eq!(parse_abolish(" member/2, append/3 ,\n"), vec!["member/2", "append/3"]);
        assert!(parse_abolish("  ").is_empty());
    }

    #[test]
    fn test_load_exercises() {
        let dir = TempDir::new().unwrap();
        let ex1 = dir.path().join("ex1");
        fs::create_dir_all(&ex1).unwrap();
        fs::write(ex1.join(TESTS_FILE), "t1\tp(<TVAR:X>)\tunify\tX=1\n").unwrap();
        fs::write(ex1.join(ABOLISH_FILE), "p/1").unwrap();
        fs::write(ex1.join(PRE_FILE), "q(1).").unwrap();

        fs::create_dir_all(dir.path().join("_drafts")).unwrap();
        fs::write(dir.path().join("_drafts").join(TESTS_FILE), "broken").unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();

        let exercises = load_exercises(dir.path()).unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "ex1");
        assert_eq!(exercises[0].test.case_count(), 1);
        assert_eq!(exercises[0].test.abolish, vec!["p/1"]);
        assert_eq!(exercises[0].test.pre, "q(1).");
        assert!(!exercises[0].test.has_database());
    }

    #[test]
    fn test_load_assignments() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("1-x-Group-1");
        fs::create_dir_all(a.join("src")).unwrap();
        fs::write(a.join("b.pl"), "b.").unwrap();
        fs::write(a.join("src").join("a.pro"), "% note\na.").unwrap();
        fs::write(a.join("readme.txt"), "ignored").unwrap();

        let empty = dir.path().join("2-x-Group-2");
        fs::create_dir_all(&empty).unwrap();
        fs::write(empty.join("hand-in.zip"), b"PK").unwrap();

        let assignments = load_assignments(dir.path(), NamingScheme::Brightspace).unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].name, "Group_1");
        assert_eq!(assignments[0].knowledge, "b.\n\na.\n");
    }

    #[test]
    fn test_missing_directory() {
        let err = load_exercises(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, GradeError::MissingDirectory { .. }));
    }
}
