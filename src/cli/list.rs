use super::ui;
use crate::core::currency::{CurrencyKind, CurrencyTable};
use comfy_table::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Fiat,
    Crypto,
}

impl ListFilter {
    fn includes(&self, kind: CurrencyKind) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Fiat => kind == CurrencyKind::Fiat,
            ListFilter::Crypto => kind == CurrencyKind::Crypto,
        }
    }
}

pub fn render(currencies: &CurrencyTable, filter: ListFilter) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Kind"),
        ui::header_cell("Symbol"),
        ui::header_cell("Country"),
    ]);

    if filter.includes(CurrencyKind::Fiat) {
        for (code, country) in currencies.fiat() {
            table.add_row(vec![
                Cell::new(code),
                Cell::new(CurrencyKind::Fiat),
                Cell::new(code),
                Cell::new(country),
            ]);
        }
    }

    if filter.includes(CurrencyKind::Crypto) {
        for asset in currencies.crypto() {
            table.add_row(vec![
                Cell::new(&asset.id),
                Cell::new(CurrencyKind::Crypto),
                Cell::new(asset.symbol.to_uppercase()),
                Cell::new("-"),
            ]);
        }
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        table
    )
}

pub fn run(currencies: &CurrencyTable, filter: ListFilter) {
    println!("{}", render(currencies, filter));
}
