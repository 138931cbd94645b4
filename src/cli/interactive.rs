use super::{convert, ui};
use crate::core::config::DefaultPair;
use crate::core::conversion::{ConversionRequest, parse_amount};
use crate::core::{ConversionSession, RateResolver};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "Enter `AMOUNT FROM TO`, `FROM TO`, `AMOUNT`, `swap` or `quit`.";

#[derive(Debug, PartialEq)]
enum Command {
    Convert(ConversionRequest),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_command(line: &str, current: &ConversionRequest) -> Command {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Command::Empty,
        [word] if matches!(word.to_lowercase().as_str(), "quit" | "exit" | "q") => Command::Quit,
        [word] if word.eq_ignore_ascii_case("help") => Command::Help,
        [word] if word.eq_ignore_ascii_case("swap") => Command::Convert(current.swapped()),
        [amount] => match parse_amount(amount) {
            Ok(amount) => Command::Convert(ConversionRequest::new(
                amount,
                &current.from,
                &current.to,
            )),
            Err(e) => Command::Invalid(e.to_string()),
        },
        [from, to] => Command::Convert(ConversionRequest::new(current.amount, from, to)),
        [amount, from, to] => Command::Convert(ConversionRequest::from_input(amount, from, to)),
        _ => Command::Invalid(format!("Could not understand '{}'", line.trim())),
    }
}

/// Reads conversion requests from stdin. A new request supersedes one still in flight.
pub async fn run(resolver: RateResolver, defaults: &DefaultPair, precision: usize) -> Result<()> {
    let mut session = ConversionSession::new(resolver);
    let mut current = ConversionRequest::new(1.0, &defaults.from, &defaults.to);

    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));
    session.submit(current.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };
                match parse_command(&line, &current) {
                    Command::Convert(request) => {
                        current = request;
                        session.submit(current.clone());
                    }
                    Command::Help => println!("{}", ui::style_text(HELP, ui::StyleType::Subtle)),
                    Command::Quit => break,
                    Command::Empty => {}
                    Command::Invalid(message) => {
                        eprintln!("{}", ui::style_text(&message, ui::StyleType::Error));
                    }
                }
            }
            Some((_key, outcome)) = session.next_result() => match outcome {
                Ok(result) => println!("{}", convert::format_result(&result, precision, false)?),
                Err(e) => convert::report_error(&e),
            },
        }
    }

    Ok(())
}
