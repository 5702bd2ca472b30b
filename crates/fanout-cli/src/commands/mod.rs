mod run;
pub use run::run;

mod refresh;
pub use refresh::refresh;
