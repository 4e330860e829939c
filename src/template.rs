//! Per-recipient message bodies.
//!
//! Placeholders are `{field}` where `field` is any key of the recipient or the
//! synthetic `masked_name`. Raw fields such as `{email}` and `{name}` are
//! intentionally allowed. `{{` and `}}` produce literal braces.

use thiserror::Error;

use crate::types::Recipient;

pub const MASKED_NAME_FIELD: &str = "masked_name";

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("template references unknown field '{0}'")]
    UnknownField(String),
    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),
    #[error("unmatched '{brace}' at byte {position}")]
    UnmatchedBrace { brace: char, position: usize },
}

pub fn render(
    template: &str,
    recipient: &Recipient,
    masked_name: &str,
) -> Result<String, TemplateError> {
    if !template.contains('{') {
        return Ok(template.to_string());
    }

    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => rendered.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => rendered.push('}'),
            '{' => {
                let start = position + 1;
                let end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some((_, '{')) | None => {
                            return Err(TemplateError::UnmatchedBrace {
                                brace: '{',
                                position,
                            })
                        }
                        Some(_) => {}
                    }
                };

                let key = &template[start..end];
                if key.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder(position));
                }
                if key == MASKED_NAME_FIELD {
                    rendered.push_str(masked_name);
                } else {
                    let value = recipient
                        .field(key)
                        .ok_or_else(|| TemplateError::UnknownField(key.to_string()))?;
                    rendered.push_str(&value);
                }
            }
            '}' => {
                return Err(TemplateError::UnmatchedBrace {
                    brace: '}',
                    position,
                })
            }
            other => rendered.push(other),
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Recipient {
        Recipient::from([
            ("email", "jane@example.com"),
            ("name", "Jane Doe"),
            ("role", "Backend Intern"),
        ])
    }

    #[test]
    fn template_without_placeholders_is_verbatim() {
        let template = "Hello there }";
        assert_eq!(render(template, &jane(), "J*** D**").unwrap(), template);
    }

    #[test]
    fn substitutes_masked_name_and_recipient_fields() {
        let rendered = render(
            "Dear {masked_name}, your {role} application ({email}) was received.",
            &jane(),
            "J*** D**",
        )
        .unwrap();

        assert_eq!(
            rendered,
            "Dear J*** D**, your Backend Intern application (jane@example.com) was received."
        );
    }

    #[test]
    fn masked_name_wins_over_a_recipient_field() {
        let recipient = Recipient::from([("email", "a@b.com"), ("masked_name", "raw")]);
        assert_eq!(render("{masked_name}", &recipient, "A").unwrap(), "A");
    }

    #[test]
    fn doubled_braces_are_literal() {
        assert_eq!(
            render("{{name}} is {name}}}", &jane(), "").unwrap(),
            "{name} is Jane Doe}"
        );
    }

    #[test]
    fn unknown_field_is_an_error() {
        assert_eq!(
            render("Hi {nickname}", &jane(), "J*** D**").unwrap_err(),
            TemplateError::UnknownField("nickname".to_string())
        );
    }

    #[test]
    fn malformed_placeholders_are_errors() {
        assert_eq!(
            render("Hi {}", &jane(), "").unwrap_err(),
            TemplateError::EmptyPlaceholder(3)
        );
        assert_eq!(
            render("Hi {name", &jane(), "").unwrap_err(),
            TemplateError::UnmatchedBrace {
                brace: '{',
                position: 3
            }
        );
        assert_eq!(
            render("{name} }", &jane(), "").unwrap_err(),
            TemplateError::UnmatchedBrace {
                brace: '}',
                position: 7
            }
        );
    }
}
