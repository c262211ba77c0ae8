//! Navigation tracking and next-screen prediction.
//!
//! The app shell reports every screen transition here. The predictor keeps a
//! bounded history of those transitions and a first-order Markov transition
//! count table, and ranks the screens the user is most likely to visit next.
//! The prefetch service uses those rankings to warm content before the user
//! taps:
//!
//! ```text
//! navigation event → NavigationHistory (bounded, FIFO)
//!                  → TransitionTable (screen → next-screen counts)
//!                          ↓
//!                  predict_next_screens()
//!                          ↓
//!                  PrefetchService (enqueue predicted content)
//! ```

mod history;
mod predictor;

pub use history::{NavigationEntry, NavigationHistory, DEFAULT_HISTORY_CAPACITY};
pub use predictor::{NavigationPredictor, ScreenPrediction, TransitionTable};
