// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Template inspection commands

use crate::cli::display::TableRenderer;
use crate::domain::template::TemplateContent;
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Parse a YAML manifest stream and list its resources by kind
    Show(ShowCommand),

    /// Validate a legacy JSON template and print it normalized
    Convert(ConvertCommand),
}

impl TemplateCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            TemplateCommands::Show(cmd) => cmd.execute(),
            TemplateCommands::Convert(cmd) => cmd.execute(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct ShowCommand {
    /// Path to the YAML manifests
    #[arg(long, short = 'f')]
    pub file: String,

    /// Template name (defaults to the file stem)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Print the normalized YAML stream instead of a table
    #[arg(long)]
    pub yaml: bool,
}

impl ShowCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let template = load_yaml_template(&self.file, self.name.clone(), &self.description)?;

        if self.yaml {
            println!("{}", template.to_yaml()?);
        } else {
            println!("{}", TableRenderer::new().render_template(&template));
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ConvertCommand {
    /// Path to the legacy JSON template
    #[arg(long, short = 'f')]
    pub file: String,
}

impl ConvertCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.file)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", self.file, e))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

        let template = TemplateContent::from_dict(&value)
            .map_err(|e| anyhow::anyhow!("Invalid template {}: {}", self.file, e))?;

        for unit in &template.units {
            tracing::info!(unit = %unit.name(), provider = %unit.provider(), "Unit");
        }
        println!("{}", serde_json::to_string_pretty(&template.to_dict())?);
        Ok(())
    }
}

/// Reads a YAML template from disk; the name defaults to the file stem.
pub fn load_yaml_template(
    file: &str,
    name: Option<String>,
    description: &str,
) -> anyhow::Result<TemplateContent> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file, e))?;
    let name = name.unwrap_or_else(|| {
        Path::new(file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string())
    });

    TemplateContent::from_yaml(name, description, &content)
        .map_err(|e| anyhow::anyhow!("Invalid template {}: {}", file, e))
}
