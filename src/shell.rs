use std::io::{BufRead, Write};

use crate::error::AppError;
use crate::presenter::{ListPresenter, SubmitOutcome};

pub const EMPTY_VIEW: &str = "No items.";

#[derive(Debug, Eq, PartialEq)]
pub enum Intent {
    Add(Option<String>),
    Done(i64),
    Remove(i64),
    Show,
    Quit,
}

/// Parses one shell line. `Ok(None)` for blank lines.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, AppError> {
    let words = shlex::split(line)
        .ok_or_else(|| AppError::InvalidInput(format!("unbalanced quotes in: {line}")))?;
    let Some((command, rest)) = words.split_first() else {
        return Ok(None);
    };

    let intent = match command.as_str() {
        "add" => {
            let text = rest.join(" ");
            Intent::Add(if rest.is_empty() { None } else { Some(text) })
        }
        "done" => Intent::Done(parse_id(command, rest)?),
        "remove" => Intent::Remove(parse_id(command, rest)?),
        "show" => Intent::Show,
        "quit" | "exit" => Intent::Quit,
        other => {
            return Err(AppError::InvalidInput(format!(
                "unknown command: {other} (expected add, done, remove, show or quit)"
            )))
        }
    };
    Ok(Some(intent))
}

fn parse_id(command: &str, rest: &[String]) -> Result<i64, AppError> {
    match rest {
        [id] => id
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("invalid item id: {id}"))),
        _ => Err(AppError::InvalidInput(format!("{command} expects one item id"))),
    }
}

pub fn write_view<W: Write>(out: &mut W, presenter: &ListPresenter<'_>) -> Result<(), AppError> {
    let rendered = presenter.render();
    if rendered.is_empty() {
        writeln!(out, "{EMPTY_VIEW}")?;
    } else {
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}

/// Runs intents from `input` until end of input or `quit`. Bad lines and
/// rejected adds are reported on `err` and the session carries on; storage
/// errors end it.
pub async fn run<R, W, E>(
    presenter: &mut ListPresenter<'_>,
    input: R,
    out: &mut W,
    err: &mut E,
) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    presenter.load().await?;
    write_view(out, presenter)?;

    for line in input.lines() {
        let line = line?;
        let intent = match parse_intent(&line) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(parse_err) => {
                writeln!(err, "{parse_err}")?;
                continue;
            }
        };

        match intent {
            Intent::Add(text) => match presenter.submit_new(text.as_deref()).await? {
                SubmitOutcome::Added(item) => writeln!(out, "Added item ID: {}", item.id)?,
                SubmitOutcome::Rejected => {
                    writeln!(err, "Nothing added: item text cannot be empty")?;
                    continue;
                }
            },
            Intent::Done(id) => {
                if !presenter.complete(id).await? {
                    writeln!(err, "No pending item with ID: {id}")?;
                }
            }
            Intent::Remove(id) => {
                if !presenter.remove(id).await? {
                    writeln!(err, "No item with ID: {id}")?;
                }
            }
            Intent::Show => {}
            Intent::Quit => break,
        }
        write_view(out, presenter)?;
    }

    out.flush()?;
    Ok(())
}
