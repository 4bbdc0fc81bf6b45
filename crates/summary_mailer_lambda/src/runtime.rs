pub use summary_mailer_core::{contract, intake, record, render};
