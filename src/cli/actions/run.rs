use super::{users, Action};
use anyhow::Result;

pub(super) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::List { globals } => users::list(&globals).await,
        Action::Add { globals, name, age } => users::add(&globals, name, age).await,
        Action::Update {
            globals,
            id,
            name,
            age,
        } => users::update(&globals, id, name, age).await,
        Action::Delete { globals, id } => users::delete(&globals, id).await,
    }
}
