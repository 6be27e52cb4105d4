//! `gd-route` — the static side of guidance: what the route says.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`instruction`] | `Instruction`, `NavigationResult`                         |
//! | [`normalize`]   | `normalize_key` — the text key used for matching          |
//! | [`index`]       | `InstructionIndex`, `SearchWindows`                       |
//! | [`maneuver`]    | `ManeuverIcon`, direction text for live descriptions      |
//! | [`loader`]      | `load_instructions_csv`, `load_instructions_reader`       |
//! | [`error`]       | `RouteError`, `RouteResult<T>`                            |
//!
//! # Matching model
//!
//! The engine describes the next maneuver in free text that usually, but not
//! always, equals one of the precomputed instruction texts.  Both sides are
//! reduced to a [`normalize_key`] and compared exactly inside a few bounded
//! windows around the current cursor:
//!
//! ```text
//!            backward      forward     extended
//!           [c-2, c-1]   [c, c+1, c+2]  [c+3 .. c+8]
//! priority:     3              1             2
//! ```

pub mod error;
pub mod index;
pub mod instruction;
pub mod loader;
pub mod maneuver;
pub mod normalize;


pub use error::{RouteError, RouteResult};
pub use index::{InstructionIndex, SearchWindows};
pub use instruction::{Instruction, NavigationResult};
pub use loader::{load_instructions_csv, load_instructions_reader};
pub use maneuver::{CONTINUE_TEXT, ManeuverIcon, classify, direction_text, is_destination_reached};
pub use normalize::normalize_key;
