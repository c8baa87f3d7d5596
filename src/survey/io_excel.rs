use calamine::{open_workbook_auto, DataType, Range, Reader};
use survey_scoring::builder::MemoryTable;

use crate::survey::{io_common::cell_to_string, *};

/// Reads a worksheet of responses into memory.
///
/// The worksheet is the one named `sheet_name`, or the only one of the
/// workbook when no name is given.
pub fn read_worksheet(path: &str, sheet_name: Option<&str>) -> AppResult<MemoryTable> {
    let wrange = get_range(path, sheet_name)?;
    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path })?;
    let header = read_row(header, 0)?;
    debug!("read_worksheet: header: {:?}", header);

    let mut table = MemoryTable::from_rows(header, Vec::new());
    for (idx, row) in rows.enumerate() {
        let cells = read_row(row, idx + 1)?;
        debug!("read_worksheet: row {}: {:?}", idx + 1, cells);
        table.push_row(cells);
    }
    info!(
        "read_worksheet: {} rows of responses in {:?}",
        table.num_rows(),
        path
    );
    Ok(table)
}

fn read_row(row: &[DataType], row_idx: usize) -> AppResult<Vec<String>> {
    let mut res: Vec<String> = Vec::new();
    for (column, cell) in row.iter().enumerate() {
        let s = cell_to_string(cell).with_context(|| ExcelWrongCellTypeSnafu {
            row: row_idx,
            column,
            content: format!("{:?}", cell),
        })?;
        res.push(s);
    }
    Ok(res)
}

fn get_range(path: &str, sheet_name: Option<&str>) -> AppResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, sheet_name);
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = sheet_name {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                sheet_name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let mut all_worksheets = workbook.worksheets();
        match all_worksheets.len() {
            1 => {
                let (worksheet_name, wrange) = all_worksheets.remove(0);
                debug!("get_range: using the only worksheet {:?}", worksheet_name);
                Ok(wrange)
            }
            count => AmbiguousWorksheetSnafu { path, count }.fail(),
        }
    }
}
