//! Talent string inspection

use anyhow::Result;
use clap::Parser;
use rogue_core::TalentConfiguration;

/// Decode a talent string and list what the level allows
#[derive(Parser)]
pub struct Talents {
    /// Talent encoding, one symbol (0-3 or '.') per tier
    #[arg(value_name = "ENCODING")]
    encoding: String,

    /// Character level
    #[arg(short, long, default_value_t = 100)]
    level: u32,

    /// Class whose tree to decode against
    #[arg(short, long, default_value = "rogue")]
    class: String,
}

impl Talents {
    pub fn execute(self) -> Result<()> {
        let talents = TalentConfiguration::decode(&self.encoding, &self.class, self.level)?;

        println!(
            "{} level {} ({} of {} tiers unlocked)",
            talents.class_id(),
            talents.level(),
            talents.top_tier(),
            talents.tree().tiers.len()
        );
        for (tier, options) in talents.tree().tiers.iter().enumerate() {
            let locked = tier >= talents.top_tier();
            let row: Vec<String> = options
                .iter()
                .map(|talent| {
                    if talents.is_active(talent) {
                        format!("[{}]", talent)
                    } else {
                        talent.to_string()
                    }
                })
                .collect();
            println!(
                "  {} {}{}",
                tier + 1,
                row.join("  "),
                if locked { "  (locked)" } else { "" }
            );
        }
        println!("Encoded: {}", talents.encode());
        Ok(())
    }
}
