use super::ui;
use crate::core::{ConversionRequest, ConversionResult, ConvertError, RateResolver};
use anyhow::Result;
use std::io::Write;
use tracing::error;

pub const RATE_UNAVAILABLE_MESSAGE: &str =
    "Error: Unable to fetch exchange rate. Please try again later.";

/// Positional `convert` arguments after splitting off the amount.
#[derive(Debug, Default, PartialEq)]
pub struct ConvertArgs {
    pub amount: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn looks_numeric(token: &str) -> bool {
    token.trim().parse::<f64>().is_ok()
}

/// Reads `[AMOUNT] [FROM] [TO]`. With fewer than three tokens the first is the
/// amount only when it parses as a number, so `USD INR` is a pair and `2 btc`
/// an amount and a source.
pub fn split_args(args: &[String]) -> ConvertArgs {
    match args {
        [] => ConvertArgs::default(),
        [first, rest @ ..] if args.len() == 3 || looks_numeric(first) => ConvertArgs {
            amount: Some(first.clone()),
            from: rest.first().cloned(),
            to: rest.get(1).cloned(),
        },
        _ => ConvertArgs {
            amount: None,
            from: args.first().cloned(),
            to: args.get(1).cloned(),
        },
    }
}

/// Message shown to the user. Upstream detail only goes to the log.
pub fn user_message(err: &ConvertError) -> String {
    match err {
        ConvertError::RateUnavailable { .. } => RATE_UNAVAILABLE_MESSAGE.to_string(),
        ConvertError::UnknownCurrency(id) => {
            format!("Error: Unknown currency '{id}'. Run `cconv list` to see supported currencies.")
        }
        ConvertError::InvalidAmount(amount) => format!("Error: Invalid amount '{amount}'"),
    }
}

pub fn report_error(err: &ConvertError) {
    // stderr may be closed; nothing else to tell the user then
    let _ = write_error(err, &mut std::io::stderr());
}

fn write_error(err: &ConvertError, out: &mut impl Write) -> std::io::Result<()> {
    error!(error = ?err, "Conversion failed");
    writeln!(out, "{}", ui::style_text(&user_message(err), ui::StyleType::Error))
}

/// Text shown for an error that reached `main`. Conversion errors were already
/// reported where they happened, so they produce nothing here.
pub fn failure_message(err: &anyhow::Error) -> Option<String> {
    if err.downcast_ref::<ConvertError>().is_some() {
        None
    } else {
        Some(format!("Error: {err:#}"))
    }
}

pub fn format_result(result: &ConversionResult, precision: usize, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(result)?)
    } else {
        Ok(ui::style_text(
            &result.display(precision),
            ui::StyleType::Result,
        ))
    }
}

pub async fn run(
    resolver: &RateResolver,
    request: &ConversionRequest,
    precision: usize,
    json: bool,
) -> Result<ConversionResult> {
    let spinner = ui::new_spinner(&format!(
        "Fetching exchange rate {} -> {}",
        request.from, request.to
    ));
    let outcome = resolver.convert(request).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            println!("{}", format_result(&result, precision, json)?);
            Ok(result)
        }
        Err(e) => {
            report_error(&e);
            Err(e.into())
        }
    }
}
