//! WBXML global tokens and header constants.
//!
//! Global tokens are shared by every code page. Tag tokens of a code page live in
//! `0x05..=0x3F`; the two high bits of a tag byte carry the attribute and content
//! flags.

/// Changes the active code page. Followed by a single page index byte.
pub const SWITCH_PAGE: u8 = 0x00;
/// Closes an attribute list or an element's content.
pub const END: u8 = 0x01;
/// Character entity. Followed by an `mb_u_int32` code point.
pub const ENTITY: u8 = 0x02;
/// Inline string. Followed by a NUL-terminated string.
pub const STR_I: u8 = 0x03;
/// Unknown tag or attribute name. Followed by an `mb_u_int32` string table offset.
pub const LITERAL: u8 = 0x04;
/// Inline string extension tokens.
pub const EXT_I_0: u8 = 0x40;
pub const EXT_I_1: u8 = 0x41;
pub const EXT_I_2: u8 = 0x42;
/// Processing instruction.
pub const PI: u8 = 0x43;
/// Unknown tag with content.
pub const LITERAL_C: u8 = 0x44;
/// Inline integer extension tokens.
pub const EXT_T_0: u8 = 0x80;
pub const EXT_T_1: u8 = 0x81;
pub const EXT_T_2: u8 = 0x82;
/// String table reference. Followed by an `mb_u_int32` offset.
pub const STR_T: u8 = 0x83;
/// Unknown tag with attributes.
pub const LITERAL_A: u8 = 0x84;
/// Single byte extension tokens.
pub const EXT_0: u8 = 0xC0;
pub const EXT_1: u8 = 0xC1;
pub const EXT_2: u8 = 0xC2;
/// Opaque data. Followed by an `mb_u_int32` length and that many bytes.
pub const OPAQUE: u8 = 0xC3;
/// Unknown tag with attributes and content.
pub const LITERAL_AC: u8 = 0xC4;

/// Tag flag: the element carries an attribute list.
pub const FLAG_ATTRIBUTES: u8 = 0x80;
/// Tag flag: the element carries content.
pub const FLAG_CONTENT: u8 = 0x40;

/// Smallest token a code page may assign.
pub const MIN_PAGE_TOKEN: u8 = 0x05;
/// Largest tag token, everything above collides with the flag bits.
pub const MAX_TAG_TOKEN: u8 = 0x3F;
/// Largest attribute start token, values from `0x80` are attribute value tokens.
pub const MAX_ATTRIBUTE_TOKEN: u8 = 0x7F;

/// Public identifier for "unknown or missing public identifier".
pub const PUBLIC_ID_UNKNOWN: u32 = 0x01;
/// IANA MIBenum of UTF-8.
pub const CHARSET_UTF8: u32 = 106;
/// IANA MIBenum of US-ASCII.
pub const CHARSET_US_ASCII: u32 = 3;

/// Applies the attribute and content flags to a tag token.
pub fn tag_byte(token: u8, has_attributes: bool, has_content: bool) -> u8 {
    let mut byte = token;
    if has_attributes {
        byte |= FLAG_ATTRIBUTES;
    }
    if has_content {
        byte |= FLAG_CONTENT;
    }
    byte
}
