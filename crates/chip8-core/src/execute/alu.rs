//! `8xyN` arithmetic with its `VF` flag output.

/// Result of an ALU operation: value for `Vx` and, when the operation
/// defines one, the value for `VF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    /// Value written to the destination register.
    pub value: u8,
    /// Value written to `VF` after the destination, if any.
    pub flag: Option<u8>,
}

impl AluResult {
    const fn with_flag(value: u8, flag: bool) -> Self {
        Self {
            value,
            flag: Some(if flag { 1 } else { 0 }),
        }
    }
}

/// `8xy4`: wrapping add, `VF` = carry.
#[must_use]
pub const fn add(vx: u8, vy: u8) -> AluResult {
    let (value, carry) = vx.overflowing_add(vy);
    AluResult::with_flag(value, carry)
}

/// `8xy5` (`vx - vy`) and `8xy7` (`vy - vx`): `VF` = NOT borrow.
#[must_use]
pub const fn sub(minuend: u8, subtrahend: u8) -> AluResult {
    let (value, borrow) = minuend.overflowing_sub(subtrahend);
    AluResult::with_flag(value, !borrow)
}

/// `8xy6`: shift right, `VF` = bit shifted out.
#[must_use]
pub const fn shift_right(source: u8) -> AluResult {
    AluResult::with_flag(source >> 1, source & 0x01 != 0)
}

/// `8xyE`: shift left, `VF` = bit shifted out.
#[must_use]
pub const fn shift_left(source: u8) -> AluResult {
    AluResult::with_flag(source << 1, source & 0x80 != 0)
}

/// `8xy1`..`8xy3`: `VF` is cleared only under the COSMAC logic quirk.
#[must_use]
pub const fn logic(value: u8, resets_vf: bool) -> AluResult {
    AluResult {
        value,
        flag: if resets_vf { Some(0) } else { None },
    }
}

#[cfg(test)]
mod tests {
    use super::{add, logic, shift_left, shift_right, sub};

    #[test]
    fn add_reports_carry() {
        assert_eq!(add(0xFF, 0x02).value, 0x01);
        assert_eq!(add(0xFF, 0x02).flag, Some(1));
        assert_eq!(add(0x10, 0x20).flag, Some(0));
    }

    #[test]
    fn sub_reports_not_borrow() {
        assert_eq!(sub(5, 3).value, 2);
        assert_eq!(sub(5, 3).flag, Some(1));
        assert_eq!(sub(3, 5).value, 0xFE);
        assert_eq!(sub(3, 5).flag, Some(0));
        assert_eq!(sub(4, 4).flag, Some(1));
    }

    #[test]
    fn shifts_expose_the_dropped_bit() {
        assert_eq!(shift_right(0b0000_0011).value, 0b0000_0001);
        assert_eq!(shift_right(0b0000_0011).flag, Some(1));
        assert_eq!(shift_left(0b1000_0001).value, 0b0000_0010);
        assert_eq!(shift_left(0b1000_0001).flag, Some(1));
        assert_eq!(shift_left(0b0100_0000).flag, Some(0));
    }

    #[test]
    fn logic_only_touches_vf_under_quirk() {
        assert_eq!(logic(7, false).flag, None);
        assert_eq!(logic(7, true).flag, Some(0));
    }
}
