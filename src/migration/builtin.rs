//! Built-in migrations.

use super::{Migration, RuleSpec};
use crate::error::Result;
use crate::lang::{Java, Language};
use crate::pipeline::RulePipeline;
use crate::source::FileMatcher;
use std::sync::Arc;

const CHRONICLE_BYTES_IMPORT: &str = "import net.openhft.chronicle.bytes.Bytes;";
const BYTES_OUT_IMPORT: &str = "import io.sirix.node.BytesOut;";
const BYTES_IN_IMPORT: &str = "import io.sirix.node.BytesIn;";

/// Chronicle `Bytes<ByteBuffer>` to the in-house `BytesOut<?>`/`BytesIn<?>`.
///
/// Rule order:
/// 1. serializer signatures take `BytesOut<?>`
/// 2. deserializer signatures take `BytesIn<?>`
/// 3. imports for `BytesOut` and `BytesIn` are added where now used
/// 4. the Chronicle `Bytes` import is dropped once nothing references it
///
/// Step 4 must come last, since steps 1-2 are what remove the references.
pub struct ChronicleBytesMigration;

impl ChronicleBytesMigration {
    const SERIALIZERS: [&'static str; 3] = ["serialize", "serializeDeweyID", "computeHash"];
    const DESERIALIZERS: [&'static str; 2] = ["deserialize", "deserializeDeweyID"];

    /// The migration's rules as data.
    pub fn rules() -> Vec<RuleSpec> {
        let signature = |method: &str, to: &str| RuleSpec::RewriteSignature {
            method: method.to_string(),
            from: "Bytes<ByteBuffer>".to_string(),
            to: to.to_string(),
        };

        let mut rules: Vec<RuleSpec> = Self::SERIALIZERS
            .iter()
            .map(|&m| signature(m, "BytesOut<?>"))
            .chain(Self::DESERIALIZERS.iter().map(|&m| signature(m, "BytesIn<?>")))
            .collect();

        rules.push(RuleSpec::EnsureImport {
            symbol: "BytesOut".to_string(),
            statement: BYTES_OUT_IMPORT.to_string(),
            marker: None,
        });
        rules.push(RuleSpec::EnsureImport {
            symbol: "BytesIn".to_string(),
            statement: BYTES_IN_IMPORT.to_string(),
            marker: None,
        });
        rules.push(RuleSpec::RemoveUnusedImport {
            statement: CHRONICLE_BYTES_IMPORT.to_string(),
            marker: "Bytes".to_string(),
        });
        rules
    }
}

impl Migration for ChronicleBytesMigration {
    fn name(&self) -> &str {
        "chronicle-bytes"
    }

    fn description(&self) -> &str {
        "Replace Chronicle Bytes<ByteBuffer> parameters with BytesOut<?>/BytesIn<?>"
    }

    fn matcher(&self) -> FileMatcher {
        FileMatcher::new()
            .extensions(Java.extensions().iter().copied())
            .exclude("**/.git/**")
            .exclude("**/build/**")
            .exclude("**/target/**")
    }

    fn pipeline(&self) -> Result<RulePipeline> {
        let language: Arc<dyn Language> = Arc::new(Java);
        let mut pipeline = RulePipeline::new().with_language(Arc::clone(&language));
        for spec in Self::rules() {
            pipeline.push(spec.to_rule(&language)?);
        }
        Ok(pipeline)
    }
}

/// Convenience function to create the Chronicle bytes migration.
pub fn chronicle_bytes_migration() -> ChronicleBytesMigration {
    ChronicleBytesMigration
}

/// All migrations that ship with the tool, in the order they run.
pub fn builtin_migrations() -> Vec<Box<dyn Migration>> {
    vec![Box::new(ChronicleBytesMigration)]
}
