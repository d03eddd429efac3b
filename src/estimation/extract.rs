/// Returns the first balanced brace-delimited substring of `text`, or None
/// if no opening brace ever closes. Brace tracking is aware of JSON string
/// literals and escapes, so `{"note": "a } inside"}` scans correctly.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let text = r#"Here you go: {"calories": 200, "unit": "serving"} Thanks!"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"calories": 200, "unit": "serving"}"#)
        );
    }

    #[test]
    fn extracts_nested_objects() {
        let text = r#"note {"a": {"b": 1}, "c": 2} trailing {"d": 3}"#;
        assert_eq!(first_json_object(text), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }

    #[test]
    fn braces_inside_strings_do_not_terminate() {
        let text = r#"{"food_description": "taco {spicy}", "calories": 300}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let text = r#"{"name": "say \"hi\" {", "n": 1}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn no_object_returns_none() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object(""), None);
    }

    #[test]
    fn unclosed_object_returns_none() {
        assert_eq!(first_json_object(r#"{"calories": 200"#), None);
    }
}
