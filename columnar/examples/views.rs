use columnar_views::{
    BooleanColumn, CodePointColumn, Column, ColumnarError, FixedBytesColumn, VarBytesColumn,
};

fn main() -> Result<(), ColumnarError> {
    let mut flags = BooleanColumn::with_capacity(4);
    flags.set(2, &true)?;
    println!("flags {:?} -> {:?}", flags.as_bytes(), flags.iter().collect::<Vec<_>>());

    let mut codes = FixedBytesColumn::with_capacity(3, 4)?;
    codes.fill("none")?;
    codes.set(1, "ab")?;
    if let Err(err) = codes.set(0, "too long") {
        println!("rejected: {}", err);
    }
    println!("codes {:?}", codes.iter().collect::<Vec<_>>());

    let mut names = CodePointColumn::with_capacity(2, 3)?;
    names.set(0, "€ur")?;
    names.set(1, "日本")?;
    println!("names {:?} cells {:?}", names.iter().collect::<Vec<_>>(), names.subarray(0, 1)?);

    let mut blobs = VarBytesColumn::from_records(["foo", "hi"])?;
    blobs.set(0, b"a much longer record")?;
    println!("blobs {:?}", blobs.iter().map(String::from_utf8_lossy).collect::<Vec<_>>());
    println!("wire  {:02x?}", blobs.as_bytes());
    Ok(())
}
