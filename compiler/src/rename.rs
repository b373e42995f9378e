//! Quote-aware variable renaming.
//!
//! Walks evaluator source text token by token. Identifiers that start with
//! an uppercase letter, or with `_` followed by more word characters, are
//! variables and get a suffix appended. The anonymous `_`, quoted atoms,
//! strings, back-quoted text, `0'c` character codes and comments are copied
//! through untouched.

/// Suffix appended to every variable of the case named `test_name`.
///
/// Characters that cannot appear in a variable name are replaced with `_`.
pub fn variable_suffix(test_name: &str) -> String {
    let mut suffix = String::with_capacity(test_name.len() + 1);
    suffix.push('_');
    for c in test_name.chars().flat_map(char::to_uppercase) {
        suffix.push(if is_word_char(c) { c } else { '_' });
    }
    suffix
}

/// Append `suffix` to every variable token in `source` outside of literals.
pub fn rename_variables(source: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(source.len() + suffix.len() * 4);
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                while let Some(q) = chars.next() {
                    out.push(q);
                    if q == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if q == c {
                        break;
                    }
                }
            }
            '%' => {
                out.push(c);
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    out.push(n);
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                if let Some(star) = chars.next() {
                    out.push(star);
                }
                let mut prev = '\0';
                for n in chars.by_ref() {
                    out.push(n);
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            c if c.is_ascii_digit() => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek().filter(|n| is_word_char(**n)) {
                    word.push(n);
                    chars.next();
                }
                out.push_str(&word);

                if word == "0" && chars.peek() == Some(&'\'') {
                    out.push('\'');
                    chars.next();
                    copy_char_code(&mut chars, &mut out);
                }
            }
            c if is_word_char(c) => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek().filter(|n| is_word_char(**n)) {
                    word.push(n);
                    chars.next();
                }
                out.push_str(&word);
                if is_variable(&word) {
                    out.push_str(suffix);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn is_variable(word: &str) -> bool {
    match word.chars().next() {
        Some('_') => word.len() > 1,
        Some(c) => c.is_uppercase(),
        None => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Copy the character after `0'`, which may be an escape or a doubled quote.
fn copy_char_code(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let Some(c) = chars.next() else {
        return;
    };
    out.push(c);
    match c {
        '\\' => {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        }
        '\'' if chars.peek() == Some(&'\'') => {
            out.push('\'');
            chars.next();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rename(source: &str) -> String {
        rename_variables(source, "_T1")
    }

    #[test]
    fn test_renames_variables_only() {
        assert_eq!(
            rename("append(Xs, [H|T], foo_Bar, _Acc, _, Out)"),
            "append(Xs_T1, [H_T1|T_T1], foo_Bar, _Acc_T1, _, Out_T1)"
        );
    }

    #[test]
    fn test_underscore_variables_not_shared() {
        let a = rename_variables("findall(_Acc, p(_Acc), L)", &variable_suffix("t1"));
        let b = rename_variables("findall(_Acc, q(_Acc), L)", &variable_suffix("t2"));
        assert_eq!(a, "findall(_Acc_T1, p(_Acc_T1), L_T1)");
        assert_eq!(b, "findall(_Acc_T2, q(_Acc_T2), L_T2)");
        assert_eq!(rename("p(_, __)"), "p(_, ___T1)");
    }

    #[test]
    fn test_quoted_literals_untouched() {
        assert_eq!(
            rename(r#"write("X"),write('Hello World'),write(X)"#),
            r#"write("X"),write('Hello World'),write(X_T1)"#
        );
    }

    #[test]
    fn test_escaped_and_doubled_quotes() {
        assert_eq!(
            rename(r#"atom_length('It''s A', N), X = "say \"Hi\" Bob""#),
            r#"atom_length('It''s A', N_T1), X_T1 = "say \"Hi\" Bob""#
        );
    }

    #[test]
    fn test_char_codes_and_numbers() {
        assert_eq!(rename("C = 0'A, N is 1E10 + 0x1F"), "C_T1 = 0'A, N_T1 is 1E10 + 0x1F");
        assert_eq!(rename("Q = 0''', X"), "Q_T1 = 0''', X_T1");
    }

    #[test]
    fn test_comments_untouched() {
        assert_eq!(
            rename("p(X) % Don't rename\n, /* Y 'z */ q(Y)"),
            "p(X_T1) % Don't rename\n, /* Y 'z */ q(Y_T1)"
        );
    }

    #[test]
    fn test_suffix_sanitized_and_uppercased() {
        assert_eq!(variable_suffix("t1"), "_T1");
        assert_eq!(variable_suffix("rev-list.2"), "_REV_LIST_2");
    }

    #[test]
    fn test_distinct_suffixes_never_collide() {
        let a = rename_variables("p(Y)", &variable_suffix("t1"));
        let b = rename_variables("p(Y)", &variable_suffix("t2"));
        assert_eq!(a, "p(Y_T1)");
        assert_eq!(b, "p(Y_T2)");
        assert_ne!(a, b);
    }
}
