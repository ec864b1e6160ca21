//! Git cheatsheet tool definition.

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

#[derive(Debug, Serialize)]
pub struct CheatsheetSection {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

pub const SECTIONS: &[CheatsheetSection] = &[
    CheatsheetSection {
        title: "Setup",
        commands: &[
            "git config --global user.name \"Your Name\"",
            "git config --global user.email \"your@example.com\"",
        ],
    },
    CheatsheetSection {
        title: "Initialize & Clone",
        commands: &["git init", "git clone <repository_url>"],
    },
    CheatsheetSection {
        title: "Staging & Commit",
        commands: &[
            "git status",
            "git add <file>",
            "git add .",
            "git commit -m \"Your message\"",
        ],
    },
    CheatsheetSection {
        title: "Branching",
        commands: &[
            "git branch",
            "git branch <branch_name>",
            "git checkout <branch_name>",
            "git checkout -b <new_branch>",
        ],
    },
    CheatsheetSection {
        title: "Merge & Rebase",
        commands: &["git merge <branch>", "git rebase <branch>"],
    },
    CheatsheetSection {
        title: "Push & Pull",
        commands: &[
            "git remote -v",
            "git remote add origin <url>",
            "git push -u origin <branch>",
            "git pull origin <branch>",
        ],
    },
    CheatsheetSection {
        title: "Undo",
        commands: &[
            "git restore <file>",
            "git reset HEAD <file>",
            "git checkout -- <file>",
            "git revert <commit_hash>",
        ],
    },
    CheatsheetSection {
        title: "Log & Diff",
        commands: &[
            "git log",
            "git log --oneline",
            "git diff",
            "git diff <commit1> <commit2>",
        ],
    },
    CheatsheetSection {
        title: "Stash",
        commands: &[
            "git stash",
            "git stash list",
            "git stash apply",
            "git stash drop",
        ],
    },
];

// ============================================================================
// Tool Definition
// ============================================================================

/// Reference of everyday git commands.
pub struct GitCheatsheetTool;

impl GitCheatsheetTool {
    pub const NAME: &'static str = "Git Cheatsheet";
    pub const CATEGORY: &'static str = "Development";
    pub const DESCRIPTION: &'static str = "A quick reference guide of common Git commands.";
}

impl Tool for GitCheatsheetTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> &str {
        Self::CATEGORY
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, _input: &Value) -> ToolResult<Value> {
        Ok(serde_json::to_value(SECTIONS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections() {
        let result = GitCheatsheetTool.execute(&Value::Null).unwrap();
        let sections = result.as_array().unwrap();
        assert_eq!(sections.len(), 9);
        assert_eq!(sections[0]["title"], "Setup");
        assert!(
            sections
                .iter()
                .all(|s| !s["commands"].as_array().unwrap().is_empty())
        );
    }
}
