use crate::commands::{with_migrated_database, CommandResult};
use catalog_db::{CatalogSeed, SeedResult, VerificationResult};

pub fn run() -> CommandResult {
    let result = with_migrated_database("seed", |pool| async move {
        let seed_result = CatalogSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;
        if seed_result.skipped {
            return Ok(seed_result);
        }

        let verification = CatalogSeed::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 7u8))?;

        if verification.all_present {
            Ok(seed_result)
        } else {
            Err(("seed_verification", verification_failure_message(&verification), 7u8))
        }
    });

    match result {
        Ok(seed_result) => CommandResult::success("seed", success_message(&seed_result)),
        Err(failure) => failure,
    }
}

fn success_message(result: &SeedResult) -> String {
    if result.skipped {
        "catalog already populated; sample products left untouched".to_string()
    } else {
        format!("loaded {} sample products", result.inserted)
    }
}

fn verification_failure_message(verification: &VerificationResult) -> String {
    let missing = verification.missing();
    if missing.is_empty() {
        "sample catalog verification failed".to_string()
    } else {
        format!("sample products missing after seeding: {}", missing.join(", "))
    }
}
