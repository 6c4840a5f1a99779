use std::fmt;
use std::str::FromStr;

use crate::installers::Tool;
use crate::installers::chocolatey::Chocolatey;
use crate::installers::compilers::Compilers;
use crate::installers::file::File;
use crate::installers::gitego::Gitego;
use crate::installers::go::Go;
use crate::installers::jq::Jq;
use crate::installers::pandoc::Pandoc;
use crate::installers::pngyu::Pngyu;
use crate::installers::yq::Yq;

/// The tools `dev install` knows about.
/// Each variant maps to one installer module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Compilers,
    Jq,
    Yq,
    Go,
    Pandoc,
    Gitego,
    File,
    Pngyu,
    Chocolatey,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Compilers,
        ToolKind::Jq,
        ToolKind::Yq,
        ToolKind::Go,
        ToolKind::Pandoc,
        ToolKind::Gitego,
        ToolKind::File,
        ToolKind::Pngyu,
        ToolKind::Chocolatey,
    ];

    pub fn tool(self) -> &'static dyn Tool {
        match self {
            ToolKind::Compilers => &Compilers,
            ToolKind::Jq => &Jq,
            ToolKind::Yq => &Yq,
            ToolKind::Go => &Go,
            ToolKind::Pandoc => &Pandoc,
            ToolKind::Gitego => &Gitego,
            ToolKind::File => &File,
            ToolKind::Pngyu => &Pngyu,
            ToolKind::Chocolatey => &Chocolatey,
        }
    }
}

/// Case-insensitive, with a few common aliases (`golang`, `choco`, ...).
impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compilers" | "compiler" | "build-tools" => Ok(ToolKind::Compilers),
            "jq" => Ok(ToolKind::Jq),
            "yq" => Ok(ToolKind::Yq),
            "go" | "golang" => Ok(ToolKind::Go),
            "pandoc" => Ok(ToolKind::Pandoc),
            "gitego" => Ok(ToolKind::Gitego),
            "file" => Ok(ToolKind::File),
            "pngyu" | "pngquant" => Ok(ToolKind::Pngyu),
            "chocolatey" | "choco" => Ok(ToolKind::Chocolatey),
            _ => {
                let valid = ToolKind::ALL
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(format!("Unknown tool '{s}'. Must be one of: {valid}"))
            }
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tool().name())
    }
}
