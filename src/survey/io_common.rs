// Primitives shared by the spreadsheet readers.

use calamine::DataType;

/// The text of a cell, as it would be typed in the form.
///
/// Returns None for cells that hold an error.
pub fn cell_to_string(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Empty => Some("".to_string()),
        // Display drops the trailing ".0" of integral values.
        DataType::Float(f) => Some(f.to_string()),
        DataType::DateTime(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(3.0)), Some("3".to_string()));
        assert_eq!(cell_to_string(&DataType::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_string(&DataType::Int(7)), Some("7".to_string()));
        assert_eq!(cell_to_string(&DataType::Empty), Some("".to_string()));
        assert_eq!(
            cell_to_string(&DataType::String("red".to_string())),
            Some("red".to_string())
        );
        assert_eq!(
            cell_to_string(&DataType::Error(calamine::CellErrorType::Div0)),
            None
        );
    }
}
