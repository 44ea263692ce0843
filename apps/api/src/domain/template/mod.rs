// Landing-page templates and their rendering for public event pages

pub mod render;
pub mod template;

pub use render::{render, RenderedPage, RenderedSection};
pub use template::{NewTemplate, Section, SectionKind, Template, TemplateUpdate, Theme};
