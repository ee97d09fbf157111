//! Operator prompt templates
//!
//! Prompt texts are plain templates with `{name}` placeholders:
//! - `{tool}`: tool number
//! - `{description}`: tool description
//! - `{rpm}`: target spindle RPM, rounded to a whole number
//! - `{dial_hint}`: the rendered `dial_hint` template, or nothing when no
//!   router model is selected
//! - `{dial}`: dial setting with one decimal (only inside `dial_hint`)

use serde::{Deserialize, Serialize};

/// Values substituted into the templates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptContext<'a> {
    /// Tool number
    pub tool: u32,
    /// Tool description
    pub description: &'a str,
    /// Target spindle RPM
    pub rpm: f64,
    /// Router dial setting, if a router model is selected
    pub dial: Option<f64>,
}

/// Operator prompt templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Ask the operator to insert the new tool
    pub insert_tool: String,
    /// Ask the operator to attach the probe (probing enabled)
    pub attach_probe: String,
    /// Ask the operator to touch off manually (probing disabled)
    pub touch_off: String,
    /// Ask the operator to set the router speed and start it
    pub start_spindle: String,
    /// Appended to `start_spindle` when a dial setting is known
    pub dial_hint: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            insert_tool: "Tool change: insert T{tool} {description}".to_string(),
            attach_probe: "Attach the probe clip and place the touch plate under the bit"
                .to_string(),
            touch_off: "Jog Z down until the bit touches the stock surface".to_string(),
            start_spindle: "Set router speed to {rpm} RPM{dial_hint} and switch the router on"
                .to_string(),
            dial_hint: " (dial {dial})".to_string(),
        }
    }
}

impl PromptTemplates {
    /// Render the tool insertion prompt
    pub fn render_insert_tool(&self, ctx: &PromptContext<'_>) -> String {
        self.render(&self.insert_tool, ctx)
    }

    /// Render the probe attach prompt
    pub fn render_attach_probe(&self, ctx: &PromptContext<'_>) -> String {
        self.render(&self.attach_probe, ctx)
    }

    /// Render the manual touch-off prompt
    pub fn render_touch_off(&self, ctx: &PromptContext<'_>) -> String {
        self.render(&self.touch_off, ctx)
    }

    /// Render the spindle start prompt, including the dial hint if any
    pub fn render_start_spindle(&self, ctx: &PromptContext<'_>) -> String {
        self.render(&self.start_spindle, ctx)
    }

    fn render(&self, template: &str, ctx: &PromptContext<'_>) -> String {
        let hint = match ctx.dial {
            Some(dial) => {
                let tenths = (dial * 10.0).round() / 10.0;
                self.dial_hint.replace("{dial}", &format!("{tenths:.1}"))
            }
            None => String::new(),
        };
        template
            .replace("{tool}", &ctx.tool.to_string())
            .replace("{description}", ctx.description)
            .replace("{rpm}", &format!("{:.0}", ctx.rpm.round()))
            .replace("{dial_hint}", &hint)
            .trim()
            .to_string()
    }
}
