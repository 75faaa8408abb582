//! Positional sub-forms: ingredient rows of a recipe, item rows of a list.

use crate::types::LineItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineField {
    Name,
    Quantity,
    Unit,
}

/// Three parallel input columns. Row `i` is `names[i]`, `quantities[i]`
/// and `units[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItemFields {
    pub names: Vec<String>,
    pub quantities: Vec<String>,
    pub units: Vec<String>,
}

impl Default for LineItemFields {
    /// A fresh form shows one empty row.
    fn default() -> Self {
        let mut fields = Self::empty();
        fields.add_row();
        fields
    }
}

impl LineItemFields {
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            quantities: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Prefill from saved rows; an empty list still gets one blank row.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, f64, &'a str)>) -> Self {
        let mut fields = Self::empty();
        for (name, quantity, unit) in rows {
            fields.names.push(name.to_string());
            fields.quantities.push(format_quantity(quantity));
            fields.units.push(unit.to_string());
        }
        if fields.names.is_empty() {
            fields.add_row();
        }
        fields
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn add_row(&mut self) {
        self.names.push(String::new());
        self.quantities.push(String::new());
        self.units.push(String::new());
    }

    pub fn remove_row(&mut self, index: usize) {
        if index < self.names.len() {
            self.names.remove(index);
        }
        if index < self.quantities.len() {
            self.quantities.remove(index);
        }
        if index < self.units.len() {
            self.units.remove(index);
        }
    }

    pub fn set(&mut self, index: usize, field: LineField, value: String) {
        let column = match field {
            LineField::Name => &mut self.names,
            LineField::Quantity => &mut self.quantities,
            LineField::Unit => &mut self.units,
        };
        if let Some(slot) = column.get_mut(index) {
            *slot = value;
        }
    }

    pub fn get(&self, index: usize, field: LineField) -> &str {
        let column = match field {
            LineField::Name => &self.names,
            LineField::Quantity => &self.quantities,
            LineField::Unit => &self.units,
        };
        column.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn collect(&self) -> Vec<LineItem> {
        zip_line_items(&self.names, &self.quantities, &self.units)
    }
}

/// One change made in a line-item editor.
#[derive(Clone, Debug, PartialEq)]
pub enum LineEdit {
    Set {
        row: usize,
        field: LineField,
        value: String,
    },
    AddRow,
    RemoveRow(usize),
}

impl LineEdit {
    pub fn apply(self, fields: &mut LineItemFields) {
        match self {
            LineEdit::Set { row, field, value } => fields.set(row, field, value),
            LineEdit::AddRow => fields.add_row(),
            LineEdit::RemoveRow(row) => fields.remove_row(row),
        }
    }
}

/// Pair the three columns by position.
///
/// A row is kept only when its name, quantity and unit are all non-empty.
/// On top of that, a quantity that does not parse as a number also drops
/// the row, since the backend stores quantities as numbers. Order is kept.
pub fn zip_line_items(names: &[String], quantities: &[String], units: &[String]) -> Vec<LineItem> {
    let mut items = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let name = name.trim();
        let quantity = quantities.get(index).map(|raw| raw.trim()).unwrap_or("");
        let unit = units.get(index).map(|raw| raw.trim()).unwrap_or("");
        if name.is_empty() || quantity.is_empty() || unit.is_empty() {
            continue;
        }
        let Ok(quantity) = quantity.parse::<f64>() else {
            continue;
        };
        items.push(LineItem {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
        });
    }
    items
}

/// `2` rather than `2.0`, `0.5` as is.
pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity}")
}

/// Integer form field: blank or unparseable becomes `None`.
pub fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}
