pub const UTF8_SPACE: u8 = 32;
pub const UTF8_COMMA: u8 = 44;
pub const UTF8_DASH: u8 = 45;
pub const UTF8_PIPE: u8 = 124;

/// The gap symbol. It is a valid cost table key on both axes,
/// but it may only ever appear in aligned output.
pub const GAP: u8 = UTF8_DASH;

/// The byte used to pad index 0 of a 1-indexed sequence.
pub const PAD: u8 = 255;

pub const DNA_ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Render a symbol for error messages and debug output.
pub fn symbol_display(symbol: u8) -> String {
    match symbol {
        0x21..=0x7e => char::from(symbol).to_string(),
        _ => format!("0x{symbol:02x}"),
    }
}
