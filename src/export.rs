//! Exports expenses to CSV and JSON and imports them from JSON.

use std::io::{Read, Write};

use serde::Serialize;

use crate::{
    Error,
    expense::{Expense, format_timestamp},
};

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    date: String,
    description: &'a str,
    amount: String,
}

/// Write `expenses` as CSV with the header `id,date,description,amount`,
/// newest first.
///
/// # Errors
/// Returns [Error::CsvError] if a row could not be written.
pub fn export_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut csv_writer = csv::Writer::from_writer(writer);

    if sorted.is_empty() {
        // serialize writes the header with the first row
        csv_writer
            .write_record(["id", "date", "description", "amount"])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    for expense in sorted {
        let row = CsvRow {
            id: expense.id.as_str(),
            date: format_timestamp(expense.date),
            description: &expense.description,
            amount: format!("{:.2}", expense.amount),
        };

        csv_writer
            .serialize(row)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Write `expenses` in the same JSON form they are stored in, pretty-printed.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the JSON could not be written.
pub fn export_json<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, expenses)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

/// Read expenses in the stored JSON form, e.g. a file written by
/// [export_json].
///
/// # Errors
/// Returns [Error::CorruptData] if the input is not a valid collection.
pub fn import_json<R: Read>(reader: R) -> Result<Vec<Expense>, Error> {
    serde_json::from_reader(reader).map_err(|error| Error::CorruptData(error.to_string()))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        expense::{Expense, ExpenseId},
    };

    use super::{export_csv, export_json, import_json};

    fn test_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: ExpenseId::new("1760733000000"),
                description: "Coffee, large".to_owned(),
                amount: 4.5,
                date: datetime!(2025-10-17 20:30 UTC),
            },
            Expense {
                id: ExpenseId::new("1760779800000"),
                description: "Lunch".to_owned(),
                amount: 12.0,
                date: datetime!(2025-10-18 09:30 UTC),
            },
        ]
    }

    #[test]
    fn csv_is_newest_first() {
        let mut buffer = Vec::new();

        export_csv(&test_expenses(), &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,date,description,amount\n\
             1760779800000,2025-10-18T09:30:00.000Z,Lunch,12.00\n\
             1760733000000,2025-10-17T20:30:00.000Z,\"Coffee, large\",4.50\n"
        );
    }

    #[test]
    fn csv_of_nothing_has_header() {
        let mut buffer = Vec::new();

        export_csv(&[], &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,date,description,amount\n"
        );
    }

    #[test]
    fn json_export_can_be_imported() {
        let mut buffer = Vec::new();

        export_json(&test_expenses(), &mut buffer).unwrap();
        let imported = import_json(buffer.as_slice()).unwrap();

        assert_eq!(imported, test_expenses());
    }

    #[test]
    fn json_export_uses_stored_form() {
        let mut buffer = Vec::new();

        export_json(&test_expenses()[1..], &mut buffer).unwrap();

        let json = String::from_utf8(buffer).unwrap();
        assert!(json.contains(r#""amount": 12,"#));
        assert!(json.contains(r#""date": "2025-10-18T09:30:00.000Z""#));
    }

    #[test]
    fn import_rejects_invalid_json() {
        let result = import_json(r#"{"id": "1"}"#.as_bytes());

        assert!(matches!(result, Err(Error::CorruptData(_))));
    }
}
