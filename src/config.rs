//! Kernel configuration
//!
//! Built-in defaults, optionally overridden by environment variables:
//! - `POPCOUNT_STRATEGY`: `intrinsic` | `table`
//! - `POPCOUNT_ALLOW_LIST`: `u8-u64` | `u8-u32`
//! - `POPCOUNT_SIGNED`: `sign-extend` | `native`

use std::env;

use log::{debug, warn};

use crate::dtype::ElementType;

/// How set bits are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// `count_ones`, i.e. the hardware popcount where available
    #[default]
    Intrinsic,
    /// 256-entry byte table summed over `w/8` chunks
    Table,
}

/// Element types accepted by strict mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllowList {
    #[default]
    Uint8Uint64,
    Uint8Uint32,
}

impl AllowList {
    pub fn types(self) -> &'static [ElementType] {
        match self {
            AllowList::Uint8Uint64 => &[ElementType::U8, ElementType::U64],
            AllowList::Uint8Uint32 => &[ElementType::U8, ElementType::U32],
        }
    }

    pub fn contains(self, ty: ElementType) -> bool {
        self.types().contains(&ty)
    }

    /// `np.uint8|np.uint64` style enumeration used in error messages
    pub fn describe(self) -> String {
        self.types()
            .iter()
            .map(|ty| ty.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// How permissive mode reinterprets signed elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignedPromotion {
    /// Sign-extend to 64 bits, then count (numpy cast to uint64)
    #[default]
    SignExtend,
    /// Count the two's complement pattern at the declared width
    NativeWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelConfig {
    pub strategy: Strategy,
    pub allow_list: AllowList,
    pub signed_promotion: SignedPromotion,
}

impl KernelConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    pub fn with_signed_promotion(mut self, signed_promotion: SignedPromotion) -> Self {
        self.signed_promotion = signed_promotion;
        self
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("POPCOUNT_STRATEGY") {
            match value.trim().to_ascii_lowercase().as_str() {
                "intrinsic" => self.strategy = Strategy::Intrinsic,
                "table" => self.strategy = Strategy::Table,
                other => warn!("Ignoring unknown POPCOUNT_STRATEGY '{other}'"),
            }
            debug!("Strategy from environment: {:?}", self.strategy);
        }
        if let Some(value) = lookup("POPCOUNT_ALLOW_LIST") {
            match value.trim().to_ascii_lowercase().as_str() {
                "u8-u64" | "uint8-uint64" => self.allow_list = AllowList::Uint8Uint64,
                "u8-u32" | "uint8-uint32" => self.allow_list = AllowList::Uint8Uint32,
                other => warn!("Ignoring unknown POPCOUNT_ALLOW_LIST '{other}'"),
            }
            debug!("Allow-list from environment: {:?}", self.allow_list);
        }
        if let Some(value) = lookup("POPCOUNT_SIGNED") {
            match value.trim().to_ascii_lowercase().as_str() {
                "sign-extend" => self.signed_promotion = SignedPromotion::SignExtend,
                "native" => self.signed_promotion = SignedPromotion::NativeWidth,
                other => warn!("Ignoring unknown POPCOUNT_SIGNED '{other}'"),
            }
            debug!("Signed promotion from environment: {:?}", self.signed_promotion);
        }
    }
}
