//! Binary-coded decimal helpers.
//!
//! The DS3231 stores every calendar and time field as one BCD digit per
//! nibble. Both conversions saturate instead of failing: values above 99 are
//! encoded as 99, and nibbles above 9 are decoded as 9.

/// Largest value representable as two BCD digits in one byte.
pub const BCD_MAX: u8 = 99;

/// Converts a binary value to packed BCD, clamping it to 99 first.
#[must_use]
pub const fn binary_to_bcd(value: u8) -> u8 {
    let value = if value > BCD_MAX { BCD_MAX } else { value };
    ((value / 10) << 4) | (value % 10)
}

/// Converts packed BCD to binary. A nibble above 9 is read as 9.
#[must_use]
pub const fn bcd_to_binary(bcd: u8) -> u8 {
    let tens = clamp_digit(bcd >> 4);
    let ones = clamp_digit(bcd & 0x0F);
    tens * 10 + ones
}

const fn clamp_digit(digit: u8) -> u8 {
    if digit > 9 {
        9
    } else {
        digit
    }
}
