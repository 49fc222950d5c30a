use crate::errors::Result;
use crate::projector::{stack_names, DisplayRow};
use tera::{Context, Tera};

const INDEX_TEMPLATE: &str = "index.html";
const INDEX_SOURCE: &str = include_str!("templates/index.html");

/// Seconds between automatic page reloads.
pub const REFRESH_SECS: u32 = 30;

/// Shown in place of an unconfigured host address.
pub const UNKNOWN_HOST: &str = "Unknown";

/// Renders the container table page.
#[derive(Debug)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        // `.html` templates are autoescaped
        tera.add_raw_template(INDEX_TEMPLATE, INDEX_SOURCE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, host_ip: Option<&str>, rows: &[DisplayRow]) -> Result<String> {
        let mut context = Context::new();
        context.insert("host_ip", host_ip.unwrap_or(UNKNOWN_HOST));
        context.insert("refresh_secs", &REFRESH_SECS);
        context.insert("stacks", &stack_names(rows));
        context.insert("rows", rows);
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }
}
