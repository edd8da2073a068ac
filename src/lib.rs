#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::RollingSum;

mod error;
pub use error::{DomainError, Result, VolatilityError};

mod ohlc;
pub use ohlc::Ohlc;

mod params;
pub use params::{EstimatorParams, Warmup};

mod series;
pub use series::Series;

mod returns;
pub use returns::log_returns;

mod parkinson;
pub use parkinson::Parkinson;

mod garman_klass;
pub use garman_klass::GarmanKlass;

mod yang_zhang;
pub use yang_zhang::YangZhang;

mod trend;
pub use trend::{Adx, DirectionalMovement, TrendSignal, TrendStrength};
