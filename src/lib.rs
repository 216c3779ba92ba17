// Owner Timeline - Core Library
// Turns scraped owner strings into a dated, deduplicated ownership history

pub mod records;        // Domain types: PersonName, CompanyName, ReasonCode
pub mod config;         // Keyword tables + per-source parsing options
pub mod error;          // Contract / construction errors
pub mod normalizer;     // Stage 1: text cleanup
pub mod noise;          // Stage 2: addresses, zips, placeholders
pub mod classifier;     // Stage 3: person vs company rules
pub mod person;         // Stage 4a: person name parsing
pub mod company;        // Stage 4b: company canonical form
pub mod deduplication;  // Stage 5: per-bucket dedup
pub mod temporal;       // Stage 6: dated buckets
pub mod invalid;        // Rejected strings with reason codes
pub mod input;          // Input contract + CSV loading
pub mod engine;         // Pipeline orchestration
pub mod report;         // Output contract

#[cfg(feature = "cli")]
pub mod logging;

// Re-export commonly used types
pub use records::{
    BatchRole, CandidateBatch, Classification, CompanyName, InvalidEntry, OwnerRecord, PersonName,
    RawCandidate, ReasonCode, SourceContext,
};
pub use config::{CompanyCasing, EngineConfig, KeywordTable, SourceOverrides, TokenOrder};
pub use error::{ContractError, EngineError};
pub use normalizer::TextNormalizer;
pub use noise::NoiseFilter;
pub use classifier::{EntityClassifier, EntityKind, EntityRule, EntityVerdict, KeywordRule};
pub use person::PersonNameParser;
pub use company::CompanyNameCanonicalizer;
pub use deduplication::DeduplicationEngine;
pub use temporal::{
    parse_sale_date, AssemblyContext, ClassifiedBatch, OwnershipTimeline, TimelineAssembler,
};
pub use invalid::InvalidCollector;
pub use input::{load_sales_csv, OwnerInput, SalesRecord};
pub use engine::OwnershipEngine;
pub use report::{OwnershipReport, PropertyOwnership, TimelineSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
