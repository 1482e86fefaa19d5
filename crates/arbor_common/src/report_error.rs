use ansi_term::Color;
use std::io;
use textwrap::{Options, WordSplitter};

/// An error that knows how to present itself to a user at the command line.
pub trait Reportable {
    fn report(&self, dest: &mut impl io::Write) -> io::Result<()>;

    fn exit_status(&self) -> i32;
}

#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    pub title: &'a str,
    pub message: Option<&'a str>,
}

const TITLE_LEADING_DASHES: usize = 10;
const TITLE_TOTAL_COLS: usize = 60;
const MESSAGE_WIDTH: usize = 60;

pub fn report_error(dest: &mut impl io::Write, report: Report) -> io::Result<()> {
    let title_style = Color::Red.bold();

    writeln!(
        dest,
        "\n{}",
        title_style.paint(format!(
            "{leading} {title} {trailing}",
            leading = "-".repeat(TITLE_LEADING_DASHES),
            title = report.title,
            trailing = "-".repeat(
                TITLE_TOTAL_COLS.saturating_sub(2 + report.title.len() + TITLE_LEADING_DASHES)
            ),
        ))
    )?;

    if let Some(message) = report.message {
        writeln!(dest)?;
        for line in message.lines() {
            let indentation = line.chars().take_while(|&c| c == ' ').count();
            let indent_str = &line[..indentation];

            let options = Options::new(MESSAGE_WIDTH)
                .word_splitter(WordSplitter::NoHyphenation)
                .initial_indent(indent_str)
                .subsequent_indent(indent_str);
            let wrapped = textwrap::wrap(&line[indentation..], options);

            if wrapped.is_empty() {
                writeln!(dest)?;
            } else {
                for wrapped_line in wrapped {
                    writeln!(dest, "{}", wrapped_line)?;
                }
            }
        }
    }

    writeln!(dest)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn report_contains_title_and_message() {
        let mut out = Vec::new();
        report_error(
            &mut out,
            Report {
                title: "Semantic Mismatch",
                message: Some(crate::lines!["first line", "  indented line"]),
            },
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Semantic Mismatch"));
        assert!(out.contains("first line"));
        assert!(out.contains("  indented line"));
    }
}
