pub mod node_path;
pub mod options;

pub use node_path::{MinimalNode, site_name_from_node_path};
pub use options::{DeleteSiteOptions, SiteListOptions, SiteListOverrides, SiteOptions};
