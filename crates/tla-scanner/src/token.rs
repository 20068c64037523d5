//! Token kinds owned by the external scanner, and the valid-symbol
//! mask the host parser passes on every call.

use serde::{Deserialize, Serialize};
use strum::EnumCount;

/// A token the scanner can hand back to the host grammar.
///
/// The layout tokens (`Indent`, `Newline`, `Dedent`) are synthetic and
/// zero-width; the operator tokens carry the span of the matched
/// lexeme. [`std::fmt::Display`] renders the grammar-facing name
/// (`"INDENT"`, `"ASCII_GEQ_OP"`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TokenType {
    // region: Delegated scans
    /// Free-form text outside any module envelope.
    ExtramodularText,
    /// Text inside `(* ... *)`, up to the next opener or closer.
    BlockCommentText,
    // endregion

    // region: Junction-list layout
    /// A junction list opened at a fresh alignment column.
    Indent,
    /// The next bullet of the current junction list.
    Newline,
    /// The innermost junction list closed.
    Dedent,
    // endregion

    // region: Module and section delimiters
    /// `====`, four or more.
    DoubleLine,
    /// `----`, four or more.
    SingleLine,
    // endregion

    // region: Prefix-conflicting operators
    /// `>`
    GtOp,
    /// `>=`
    AsciiGeqOp,
    /// `>>`
    RAngleBracket,
    /// `>>_`
    RAngleBracketSub,
    /// `=`
    EqOp,
    /// `==`
    AsciiDefEq,
    /// `=>`
    AsciiImpliesOp,
    /// `=<`
    AsciiEqltOp,
    /// `=|`
    AsciiLdttOp,
    /// `-`
    Dash,
    /// `--`
    MinusMinusOp,
    /// `-+->`
    AsciiPlusArrowOp,
    /// `-|`
    AsciiLsttOp,
    /// `->`
    RArrow,
    // endregion
}

/// The set of scanner-owned tokens the grammar will accept at the
/// current position.
///
/// The host sets one bit per [`TokenType`]; the all-bits mask doubles
/// as the error-recovery signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ValidTokens(u32);

impl ValidTokens {
    /// No token is acceptable.
    pub const NONE: Self = Self(0);
    /// Every scanner-owned token is acceptable.
    pub const ALL: Self = Self((1u32 << TokenType::COUNT) - 1);

    /// Whether the mask accepts `token`.
    #[must_use]
    pub const fn contains(self, token: TokenType) -> bool {
        self.0 & (1 << token as u32) != 0
    }

    /// The mask with `token` added.
    #[must_use]
    pub const fn with(self, token: TokenType) -> Self {
        Self(self.0 | (1 << token as u32))
    }

    /// The mask with `token` removed.
    #[must_use]
    pub const fn without(self, token: TokenType) -> Self {
        Self(self.0 & !(1 << token as u32))
    }

    /// The raw bits, one per [`TokenType`] discriminant.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a mask from raw bits, ignoring bits beyond the token set.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Every scanner-owned bit set at once is the host's signal that it
    /// is recovering from a syntax error.
    #[must_use]
    pub const fn is_error_recovery(self) -> bool {
        self.0 == Self::ALL.0
    }
}

impl FromIterator<TokenType> for ValidTokens {
    fn from_iter<I: IntoIterator<Item = TokenType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, ValidTokens::with)
    }
}
