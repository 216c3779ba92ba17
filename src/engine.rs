// 🏭 Ownership Engine - Normalize → filter → classify → parse → dedup → assemble
// Pure and synchronous: one call per property, no state shared between calls

use crate::classifier::{EntityClassifier, EntityKind};
use crate::company::CompanyNameCanonicalizer;
use crate::config::EngineConfig;
use crate::deduplication::DeduplicationEngine;
use crate::error::{ContractError, EngineError};
use crate::input::OwnerInput;
use crate::invalid::InvalidCollector;
use crate::noise::NoiseFilter;
use crate::normalizer::TextNormalizer;
use crate::person::PersonNameParser;
use crate::records::{BatchRole, CandidateBatch, Classification, OwnerRecord, ReasonCode, SourceContext};
use crate::report::PropertyOwnership;
use crate::temporal::{AssemblyContext, ClassifiedBatch, TimelineAssembler};
use serde_json::Value;
use std::collections::HashSet;

pub struct OwnershipEngine {
    config: EngineConfig,
    normalizer: TextNormalizer,
    noise: NoiseFilter,
    classifier: EntityClassifier,
    persons: PersonNameParser,
    companies: CompanyNameCanonicalizer,
    assembler: TimelineAssembler,
}

impl OwnershipEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let keywords = &config.keywords;

        Ok(OwnershipEngine {
            normalizer: TextNormalizer::new(keywords),
            noise: NoiseFilter::new(keywords)?,
            classifier: EntityClassifier::new(keywords)?,
            persons: PersonNameParser::new(config.token_order, keywords),
            companies: CompanyNameCanonicalizer::new(keywords, config.company_casing),
            assembler: TimelineAssembler::new(DeduplicationEngine::new(
                keywords,
                config.backfill_duplicates,
            )),
            config,
        })
    }

    /// Swap in a custom rule set (extra jurisdiction-specific rules, say)
    pub fn with_classifier(mut self, classifier: EntityClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one raw string through the per-string stages
    pub fn classify(&self, raw: &str) -> Classification {
        self.classify_normalized(&self.normalizer.normalize(raw))
    }

    fn classify_normalized(&self, normalized: &str) -> Classification {
        if normalized.is_empty() {
            return Err(ReasonCode::Empty);
        }

        if let Some(reason) = self.noise.verdict(normalized) {
            return Err(reason);
        }

        let verdict = self.classifier.classify(normalized)?;
        tracing::debug!(
            text = normalized,
            kind = ?verdict.kind,
            rule = verdict.rule_id.as_deref().unwrap_or("fallthrough"),
            matched = verdict.matched.as_deref().unwrap_or(""),
            "classified owner candidate"
        );

        match verdict.kind {
            EntityKind::Company => self
                .companies
                .company(normalized)
                .map(|c| vec![OwnerRecord::Company(c)])
                .ok_or(ReasonCode::Unclassified),
            EntityKind::Person => {
                let people = self.persons.parse(normalized)?;
                Ok(people.into_iter().map(OwnerRecord::Person).collect())
            }
        }
    }

    /// Resolve one property's ownership history
    pub fn resolve(&self, input: &OwnerInput) -> PropertyOwnership {
        let mut ctx = AssemblyContext::new();
        self.resolve_with_context(input, &mut ctx)
    }

    /// Resolve with a caller-owned `unknown_date_N` counter
    pub fn resolve_with_context(
        &self,
        input: &OwnerInput,
        ctx: &mut AssemblyContext,
    ) -> PropertyOwnership {
        let mut invalid = InvalidCollector::new();
        let dedup = self.assembler.deduplicator();

        // Keys of grantees on dated sales seen so far
        let mut earlier_grantees: HashSet<String> = HashSet::new();
        let mut batches: Vec<ClassifiedBatch> = Vec::new();

        for batch in input.candidate_batches() {
            let role = batch.role;
            let mut classified = self.classify_batch(batch, &mut invalid);

            match role {
                BatchRole::DatedGrantor => classified.records.retain(|record| {
                    let seen = earlier_grantees.contains(&dedup.key(record));
                    if seen {
                        tracing::debug!(
                            owner = %record.display_name(),
                            "grantor already owns from an earlier sale"
                        );
                    }
                    !seen
                }),
                BatchRole::Owner => {
                    if let SourceContext::Date(_) = classified.context {
                        earlier_grantees.extend(classified.records.iter().map(|r| dedup.key(r)));
                    }
                }
            }

            batches.push(classified);
        }

        let owners_by_date = self.assembler.assemble(batches, ctx);
        let ownership = PropertyOwnership::new(owners_by_date, invalid.into_entries());

        let summary = ownership.summary();
        tracing::info!(
            buckets = summary.buckets,
            persons = summary.persons,
            companies = summary.companies,
            invalid = summary.invalid,
            "resolved ownership timeline"
        );

        ownership
    }

    /// Validate untyped JSON input, then resolve it
    pub fn resolve_value(&self, value: &Value) -> Result<PropertyOwnership, ContractError> {
        let input = OwnerInput::from_value(value)?;
        Ok(self.resolve(&input))
    }

    fn classify_batch(&self, batch: CandidateBatch, invalid: &mut InvalidCollector) -> ClassifiedBatch {
        let mut records = Vec::new();

        for candidate in &batch.candidates {
            let normalized = self.normalizer.normalize(&candidate.text);
            match self.classify_normalized(&normalized) {
                Ok(found) => records.extend(found),
                Err(reason) => {
                    invalid.record(&candidate.text, &normalized, reason);
                }
            }
        }

        ClassifiedBatch {
            context: batch.context,
            records,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
