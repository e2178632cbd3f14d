pub mod users;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    List {
        globals: GlobalArgs,
    },
    Add {
        globals: GlobalArgs,
        name: String,
        age: String,
    },
    Update {
        globals: GlobalArgs,
        id: i64,
        name: Option<String>,
        age: Option<String>,
    },
    Delete {
        globals: GlobalArgs,
        id: i64,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
