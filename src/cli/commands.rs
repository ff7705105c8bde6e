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

use crate::cli::k8s::K8sCommands;
use crate::cli::serve::ServeCommand;
use crate::cli::template::TemplateCommands;

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the web front-end
    Serve(ServeCommand),

    /// Inspect and convert environment templates
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Manage hackathon environments on Kubernetes
    #[command(subcommand)]
    K8s(K8sCommands),
}

impl Commands {
    pub async fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Serve(cmd) => cmd.execute().await,
            Commands::Template(cmd) => cmd.execute(),
            Commands::K8s(cmd) => cmd.execute().await,
        }
    }
}
