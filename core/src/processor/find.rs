#![deny(missing_docs)]

//! # Find Processor
//!
//! Parse -> find -> return matches. Never writes to disk.

use super::ProcessorOutcome;
use crate::error::EngineResult;
use crate::finder;
use crate::fs::Filesystem;
use crate::manifest::FindOperation;
use crate::parser;

/// Executes a read-only structural search.
#[derive(Debug)]
pub struct FindProcessor {
    op: FindOperation,
    fs: Filesystem,
}

impl FindProcessor {
    pub(crate) fn new(op: FindOperation, fs: Filesystem) -> Self {
        FindProcessor { op, fs }
    }

    /// Runs the search and returns the matches in document order.
    pub fn run(&self) -> EngineResult<ProcessorOutcome> {
        let code = self.fs.read(&self.op.file)?;
        let tree = parser::parse_source(&code, &self.op.file)?;
        let matches = finder::find(&tree, &self.op.spec)?;
        tracing::info!(
            file = %self.op.file.display(),
            count = matches.len(),
            "find completed"
        );
        Ok(ProcessorOutcome::Matches {
            path: self.op.file.clone(),
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::SearchSpec;
    use crate::node::NodeKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_find_processor_reads_and_matches() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "struct Widget;\nimpl Widget {{ fn bar(&self) {{}} }}\n").unwrap();

        let processor = FindProcessor::new(
            FindOperation {
                file: file.path().to_path_buf(),
                spec: SearchSpec {
                    kind: NodeKind::Method,
                    name: Some("bar".into()),
                    pattern: None,
                    within: Some("Widget".into()),
                },
            },
            Filesystem,
        );

        match processor.run().unwrap() {
            ProcessorOutcome::Matches { matches, .. } => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].name, "bar");
            }
            other => panic!("expected matches, got {:?}", other),
        }
    }

    #[test]
    fn test_find_processor_surfaces_parse_failure() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "struct {{ broken").unwrap();

        let processor = FindProcessor::new(
            FindOperation {
                file: file.path().to_path_buf(),
                spec: SearchSpec {
                    kind: NodeKind::Struct,
                    name: None,
                    pattern: None,
                    within: None,
                },
            },
            Filesystem,
        );
        assert!(processor.run().is_err());
    }
}
