//! Capabilities a caller plugs into a paginated list

use async_trait::async_trait;

use crate::error::SourceError;

/// What the session should do after an item action succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Leave the selection as it is
    Keep,
    /// Clear the selection
    Deselect,
    /// Drop the item from the list and clear the selection
    Remove,
    /// Pull the whole list again from the data source
    Reload,
    /// Post a standalone message next to the list
    Reply(String),
    /// Post a file next to the list
    Document { file_name: String, bytes: Vec<u8> },
}

/// How the paginator looks at items it cannot inspect itself
#[async_trait]
pub trait ItemSemantics: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    /// Value of `attribute` used for filter classification
    fn stringify(&self, item: &Self::Item, attribute: &str) -> String;

    /// Whether `a` is strictly less than `b` on the sort key `key`
    fn less_than(&self, a: &Self::Item, b: &Self::Item, key: &str) -> bool;

    /// One HTML line describing the item
    fn render_line(&self, item: &Self::Item, selected: bool) -> String;

    fn actions(&self, item: &Self::Item) -> Vec<String>;

    async fn execute(&self, item: &mut Self::Item, action: &str) -> Result<ActionOutcome, SourceError>;

    /// Optional summary line below the list
    fn footer(&self, _visible: &[&Self::Item]) -> Option<String> {
        None
    }
}

/// Where the items come from
#[async_trait]
pub trait DataSource: ItemSemantics {
    async fn reload(&self) -> Result<Vec<Self::Item>, SourceError>;
}
