//! Delimiter lint.
//!
//! Reports what the scanner silently skips: openers that are never closed and
//! substitution bodies that are not placeholder names. Linting never changes
//! what [`crate::Scanner::scan`] returns.

use crate::scanner::CharCursor;
use memchr::{memchr, memmem};
use stencil_carton::char_codes::{LEFT_BRACE, PERCENT};
use stencil_carton::{is_dotted_name, SUBST_CLOSE, TAG_CLOSE};
use stencil_relief::{Diagnostic, DiagnosticCode};

/// Lint flattened document text.
pub fn lint(text: &str) -> Vec<Diagnostic> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut cursor = CharCursor::new(text);
    let mut diagnostics = Vec::new();
    let mut pos = 0;

    while let Some(found) = memchr(LEFT_BRACE, &bytes[pos..]) {
        let start = pos + found;
        let closer = match bytes.get(start + 1) {
            Some(&LEFT_BRACE) => SUBST_CLOSE,
            Some(&PERCENT) => TAG_CLOSE,
            _ => {
                pos = start + 1;
                continue;
            }
        };

        let body_start = start + 2;
        let close = memmem::find(&bytes[body_start..], closer.as_bytes()).map(|i| body_start + i);
        let reopen = find_opener(&bytes[body_start..]).map(|i| body_start + i);

        match close {
            Some(close) if reopen.map_or(true, |r| r > close) => {
                if closer == SUBST_CLOSE {
                    if let Some(diagnostic) = check_body(&text[body_start..close]) {
                        diagnostics.push(diagnostic.with_offset(cursor.advance_to(start)));
                    }
                }
                pos = close + 2;
            }
            _ => {
                let opener = &text[start..body_start];
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::MalformedInput,
                        format!("`{opener}` is never closed with `{closer}`"),
                    )
                    .with_offset(cursor.advance_to(start)),
                );
                pos = body_start;
            }
        }

        if pos >= len {
            break;
        }
    }

    diagnostics
}

/// Offset of the next `{{` or `{%` in `bytes`
fn find_opener(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    while let Some(found) = memchr(LEFT_BRACE, &bytes[pos..]) {
        let at = pos + found;
        match bytes.get(at + 1) {
            Some(&LEFT_BRACE) | Some(&PERCENT) => return Some(at),
            Some(_) => pos = at + 1,
            None => return None,
        }
    }
    None
}

fn check_body(body: &str) -> Option<Diagnostic> {
    let name = body.split('|').next().unwrap_or(body).trim();
    if name.is_empty() {
        return Some(Diagnostic::new(
            DiagnosticCode::InvalidName,
            "empty placeholder `{{ }}`",
        ));
    }
    if is_dotted_name(name) {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticCode::InvalidName,
        format!(
            "`{{{{ {name} }}}}` is not a placeholder name and will be ignored; \
             names may only contain letters, digits, `_` and `.`"
        ),
    ))
}
