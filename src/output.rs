use std::io::Write;

use crate::error::Result;
use crate::led_coords::Layout;

pub fn to_json(layout: &Layout, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    };
    Ok(json)
}

/// Writes the layout as one JSON document followed by a newline.
///
/// The document is rendered before anything is written, so a failure leaves
/// the writer untouched.
pub fn write_layout<W: Write>(mut writer: W, layout: &Layout, pretty: bool) -> Result<()> {
    let json = to_json(layout, pretty)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
