pub mod diagram;
pub mod table;
pub mod view;

pub use diagram::{
    Diagram, DisplaySettings, EdgeMarker, MarkerKind, Position, RelationshipEdge, TableData,
    TableNode, DEFAULT_EDGE_KIND, TABLE_NODE_KIND,
};
pub use table::Column;
pub use view::{ErdView, ViewData};
