//! Source-annotated error reports

use crate::adapter::AdaptError;
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

/// Render `err` against the source it came from.
///
/// Errors without a source position render as their plain message.
pub fn render(name: &str, source: &str, err: &AdaptError) -> String {
    let Some(span) = err.span() else {
        return format!("Error: {}\n", err);
    };

    let message = err.to_string();
    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, (name, span.start..span.end))
        .with_config(
            Config::default()
                .with_color(false)
                .with_index_type(IndexType::Byte),
        )
        .with_message(&message)
        .with_label(Label::new((name, span.start..span.end)).with_message(label_for(err)))
        .finish()
        .write((name, Source::from(source)), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("Error: {}\n", message),
    }
}

fn label_for(err: &AdaptError) -> &'static str {
    match err {
        AdaptError::Lex(_) => "cannot tokenize this",
        AdaptError::Directive(_) => "while parsing this",
        AdaptError::UnknownDirective { .. } => "not a registered directive",
        AdaptError::UnexpectedToken { .. } => "unexpected here",
        AdaptError::UnclosedBlock { .. } => "opened here",
        AdaptError::DuplicateApp { .. } => "app defined again here",
        AdaptError::Encode(_) => "",
    }
}
