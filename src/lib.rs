//! # Lune Core Library
//!
//! Calendar-grade lunar ephemeris: the Moon's phase, illumination, age and
//! distance at any instant, and the instants of the four principal phases
//! (new, first quarter, full, last quarter).
//!
//! ## Design Philosophy
//!
//! ### Pure Functions
//! Every operation is a deterministic function of its arguments. Nothing is
//! cached, no global state is mutated, and all functions are safe to call
//! from any thread.
//!
//! ### Time Handling
//! Instants are `chrono::DateTime<Utc>` and are treated as a linear count of
//! milliseconds. Internally everything runs on the Julian date scale (see
//! [`julian`]); no timezone rules ever apply.
//!
//! ### Accuracy
//! - **Phase snapshot**: epoch-1980 two-body model, ~0.001 in phase fraction
//! - **Quarter instants**: mean lunation model plus a 13/15 term correction,
//!   typically within an hour of almanac values
//!
//! ## Core Operations
//! - [`phase`]: instantaneous [`PhaseSnapshot`]
//! - [`phase_hunt`]: the [`PhaseHunt`] bracketing an instant
//! - [`phase_range`]: every occurrence of one [`PhaseSelector`] in a window
//!
//! # Example
//! ```
//! use lune::{parse_instant, phase, phase_range, PhaseSelector};
//!
//! let at = parse_instant("2014-02-17T00:00:00-05:00").unwrap();
//! let snap = phase(Some(at)).unwrap();
//! assert!((snap.phase - 0.568).abs() < 0.001);
//!
//! let start = parse_instant("2014-01-01").unwrap();
//! let end = parse_instant("2014-12-31").unwrap();
//! let fulls = phase_range(start, end, PhaseSelector::Full).unwrap();
//! assert_eq!(fulls.len(), 12);
//! ```

pub mod angles;
pub mod config;
pub mod constants;
pub mod error;
pub mod julian;
pub mod kepler;
pub mod lunar;
pub mod quarters;
pub mod renderer;

pub use error::{LuneError, Result};
pub use julian::{from_instant, instant_from_millis, parse_instant, to_instant};
pub use lunar::{phase, PhaseSnapshot};
pub use quarters::{
    mean_phase, phase_hunt, phase_range, true_phase, PhaseHunt, PhaseSelector, PHASE_FIRST,
    PHASE_FULL, PHASE_LAST, PHASE_NEW,
};
