use arbitrary::Arbitrary;
use columnar_views::{CodePointColumn, Column, ColumnarError, FixedBytesColumn, VarBytesColumn};

#[derive(Debug, Clone, Arbitrary, PartialEq)]
pub enum VarAction {
    Set { idx: u8, value: Vec<u8> },
    Fill(Vec<u8>),
    SetColumn(Vec<Vec<u8>>),
    Subarray { begin: u8, end: u8 },
}

/// Applies `actions` to a column built from `records` and to a plain
/// `Vec<Vec<u8>>` model, checking they agree after every step.
pub fn test_var_actions(records: Vec<Vec<u8>>, actions: Vec<VarAction>) {
    let mut column = VarBytesColumn::from_records(&records).unwrap();
    let mut model = records;
    for action in actions {
        let before = column.clone();
        let result = match &action {
            VarAction::Set { idx, value } => column.set(*idx as usize, value).map(|_| {
                model[*idx as usize] = value.clone();
            }),
            VarAction::Fill(value) => column.fill(value).map(|_| {
                model.iter_mut().for_each(|r| *r = value.clone());
            }),
            VarAction::SetColumn(other) => {
                let other = VarBytesColumn::from_records(other).unwrap();
                column.set_column(&other).map(|_| {
                    for (i, r) in other.iter().enumerate() {
                        model[i] = r.to_vec();
                    }
                })
            }
            VarAction::Subarray { begin, end } => column
                .subarray(*begin as usize, *end as usize)
                .map(|bytes| {
                    let (begin, end) = (*begin as usize, *end as usize);
                    let expected: usize = (begin..end)
                        .map(|i| model[i].len() + if i > begin { 4 } else { 0 })
                        .sum();
                    assert_eq!(bytes.len(), expected);
                }),
        };
        if result.is_err() {
            assert_eq!(column, before, "{:?} failed but changed the column", action);
        }
        assert_eq!(column.len(), model.len());
        for (i, r) in model.iter().enumerate() {
            assert_eq!(column.get(i).unwrap(), r.as_slice());
        }
    }
    let reparsed = VarBytesColumn::from_bytes(column.as_bytes().to_vec()).unwrap();
    assert_eq!(reparsed, column);
}

/// Decoding arbitrary bytes never panics, and whatever decodes re-encodes to
/// the same bytes.
pub fn test_var_from_bytes(bytes: &[u8]) {
    if let Ok(column) = VarBytesColumn::from_bytes(bytes.to_vec()) {
        let encoded = VarBytesColumn::from_records(column.iter()).unwrap();
        assert_eq!(encoded.as_bytes(), bytes);
    }
}

#[derive(Debug, Clone, Arbitrary, PartialEq)]
pub enum FixedAction {
    Set { idx: u8, value: String },
    SetCodePoints { idx: u8, cells: Vec<u32> },
    Fill(String),
}

pub fn test_fixed_actions(len: u8, chars: u8, actions: Vec<FixedAction>) {
    let (len, chars) = (len as usize % 16, chars as usize % 8);
    let bytes = FixedBytesColumn::with_capacity(len, chars);
    let cells = CodePointColumn::with_capacity(len, chars);
    let (mut bytes, mut cells) = match (bytes, cells) {
        (Ok(b), Ok(c)) => (b, c),
        (Err(ColumnarError::ZeroStride), Err(ColumnarError::ZeroStride)) => return,
        other => panic!("inconsistent construction {:?}", other),
    };
    for action in actions {
        match action {
            FixedAction::Set { idx, value } => {
                let idx = idx as usize;
                if bytes.set(idx, &value).is_ok() && !value.contains('\0') {
                    assert_eq!(bytes.get(idx).unwrap(), value);
                }
                if cells.set(idx, &value).is_ok() {
                    assert_eq!(cells.get(idx).unwrap(), value.trim_end_matches('\0'));
                }
            }
            FixedAction::SetCodePoints { idx, cells: raw } => {
                let before = cells.clone();
                if cells.set_code_points(idx as usize, &raw).is_err() {
                    assert_eq!(cells, before);
                }
            }
            FixedAction::Fill(value) => {
                let before = bytes.clone();
                match bytes.fill(&value) {
                    Ok(()) => {
                        let expected = value.replace('\0', "");
                        assert!(bytes.iter().all(|s| s == expected));
                    }
                    Err(_) => assert_eq!(bytes, before),
                }
                let before = cells.clone();
                match cells.fill(&value) {
                    Ok(()) => {
                        let expected = value.trim_end_matches('\0');
                        assert!(cells.iter().all(|s| s == expected));
                    }
                    Err(_) => assert_eq!(cells, before),
                }
            }
        }
        assert_eq!(bytes.as_bytes().len(), len * chars);
        assert_eq!(cells.as_bytes().len(), len * chars * 4);
    }
}
