//! Skills whose protocol integration is not built yet.
//!
//! They accept their arguments, explain what the finished skill needs, and
//! return [`Outcome::NotImplemented`] so `main` can exit successfully.

use std::io::Write;

use super::Outcome;

const SDK_REFERENCE: &str = "Reference: https://docs.bsvblockchain.org/guides/sdks/ts/";
const ECDH_REFERENCE: &str =
    "Reference: https://docs.bsvblockchain.org/guides/sdks/ts/low-level/ecdh";
const BSOCIAL_REFERENCE: &str =
    "See: /.flow/repos/bsv-mcp/tools/bsocial/ for reference implementation";
const BMAP_READ_REFERENCE: &str =
    "See: /.flow/repos/bsv-mcp/tools/bsocial/bmapReadPosts.ts for reference";

/// How the step list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steps {
    /// `1. step`
    Numbered,
    /// `  - step`
    Bulleted,
}

/// Description of an unfinished skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Lines printed, followed by a blank line, before the notice.
    pub preamble: Vec<String>,
    pub requires: &'static str,
    /// Heading of the step list.
    pub steps_title: &'static str,
    pub style: Steps,
    pub steps: &'static [&'static str],
    /// Closing pointer to prior art.
    pub footer: &'static str,
}

impl Placeholder {
    pub fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if !self.preamble.is_empty() {
            for line in &self.preamble {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "⚠️  {}", self.requires)?;
        writeln!(out)?;
        writeln!(out, "{}", self.steps_title)?;
        for (i, step) in self.steps.iter().enumerate() {
            match self.style {
                Steps::Numbered => writeln!(out, "{}. {step}", i + 1)?,
                Steps::Bulleted => writeln!(out, "  - {step}")?,
            }
        }
        writeln!(out)?;
        writeln!(out, "{}", self.footer)
    }
}

pub fn send() -> Outcome {
    Outcome::NotImplemented(Placeholder {
        preamble: Vec::new(),
        requires: "wallet-send-bsv skill requires @bsv/sdk integration",
        steps_title: "To implement:",
        style: Steps::Numbered,
        steps: &[
            "Install @bsv/sdk package",
            "Import PrivateKey, Transaction, P2PKH classes",
            "Fetch UTXOs from WhatsOnChain",
            "Build transaction with inputs/outputs",
            "Sign and broadcast",
        ],
        footer: SDK_REFERENCE,
    })
}

pub fn encrypt_message() -> Outcome {
    Outcome::NotImplemented(Placeholder {
        preamble: Vec::new(),
        requires: "wallet-encrypt-decrypt skill requires @bsv/sdk ECDH integration",
        steps_title: "To implement:",
        style: Steps::Numbered,
        steps: &[
            "Import PrivateKey, PublicKey from @bsv/sdk",
            "Generate ephemeral key pair",
            "Compute ECDH shared secret",
            "Encrypt message with AES-256-GCM",
            "Return ephemeral pubkey + encrypted data",
        ],
        footer: ECDH_REFERENCE,
    })
}

pub fn create_post() -> Outcome {
    Outcome::NotImplemented(Placeholder {
        preamble: Vec::new(),
        requires: "bsocial-posts skill requires BMAP protocol integration",
        steps_title: "To implement:",
        style: Steps::Numbered,
        steps: &[
            "Build BMAP-compliant OP_RETURN transaction",
            "Include post content in structured format",
            "Sign with identity key",
            "Broadcast to BSV network",
            "Post indexed by BMAP API services",
        ],
        footer: BSOCIAL_REFERENCE,
    })
}

pub fn read_posts(address: &str) -> Outcome {
    Outcome::NotImplemented(Placeholder {
        preamble: vec![format!("Reading BSocial posts for address: {address}")],
        requires: "This skill requires BMAP API integration",
        steps_title: "BMAP API endpoints for reading posts:",
        style: Steps::Bulleted,
        steps: &[
            "Query by address",
            "Filter by app/protocol",
            "Parse BMAP transactions",
        ],
        footer: BMAP_READ_REFERENCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(outcome: Outcome) -> String {
        let Outcome::NotImplemented(p) = outcome else {
            panic!("expected a placeholder");
        };
        let mut buf = Vec::new();
        p.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn every_placeholder_is_not_implemented() {
        for outcome in [send(), encrypt_message(), create_post(), read_posts("1A")] {
            assert!(matches!(outcome, Outcome::NotImplemented(_)));
        }
    }

    #[test]
    fn snapshot_send() {
        insta::assert_snapshot!(rendered(send()).trim(), @r"
        ⚠️  wallet-send-bsv skill requires @bsv/sdk integration

        To implement:
        1. Install @bsv/sdk package
        2. Import PrivateKey, Transaction, P2PKH classes
        3. Fetch UTXOs from WhatsOnChain
        4. Build transaction with inputs/outputs
        5. Sign and broadcast

        Reference: https://docs.bsvblockchain.org/guides/sdks/ts/
        ");
    }

    #[test]
    fn snapshot_read_posts() {
        insta::assert_snapshot!(rendered(read_posts("1BoatSLRHtKNngkdXEeobR76b53LETtpyT")).trim(), @r"
        Reading BSocial posts for address: 1BoatSLRHtKNngkdXEeobR76b53LETtpyT

        ⚠️  This skill requires BMAP API integration

        BMAP API endpoints for reading posts:
          - Query by address
          - Filter by app/protocol
          - Parse BMAP transactions

        See: /.flow/repos/bsv-mcp/tools/bsocial/bmapReadPosts.ts for reference
        ");
    }

    #[test]
    fn create_post_points_at_bsocial_tools() {
        assert!(rendered(create_post()).ends_with(
            "5. Post indexed by BMAP API services\n\n\
             See: /.flow/repos/bsv-mcp/tools/bsocial/ for reference implementation\n"
        ));
    }

    #[test]
    fn encrypt_message_points_at_ecdh_guide() {
        assert!(rendered(encrypt_message()).ends_with(&format!("{ECDH_REFERENCE}\n")));
    }
}
