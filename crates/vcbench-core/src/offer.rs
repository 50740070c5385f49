//! Credential offer payloads.
//!
//! An [`OfferFactory`] combines the identifiers discovered on the agent
//! ([`OfferContext`]) with an [`AttributeTemplate`] and stamps every
//! attribute value with a random six-digit suffix, so no two offers in a
//! load run carry identical content.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Message type of the credential preview in an issue-credential 1.0 offer.
pub const CREDENTIAL_PREVIEW_TYPE: &str =
    "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/issue-credential/1.0/credential-preview";

/// Schema name of the registration credential.
pub const REGISTRATION_SCHEMA_NAME: &str = "registration.registries.ca";
/// Schema version of the registration credential.
pub const REGISTRATION_SCHEMA_VERSION: &str = "1.0.42";

const REGISTRATION_ATTRIBUTES: [&str; 19] = [
    "registration_id",
    "registration_date",
    "registration_expiry_date",
    "registration_renewal_effective",
    "entity_name",
    "entity_name_effective",
    "entity_name_assumed",
    "entity_name_assumed_effective",
    "entity_name_trans",
    "entity_name_trans_effective",
    "entity_status",
    "entity_status_effective",
    "entity_type",
    "registered_jurisdiction",
    "extra_jurisdictional_registration",
    "home_jurisdiction",
    "effective_date",
    "reason_description",
    "expiry_date",
];

const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// One (name, value) pair of a credential preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialAttribute {
    pub name: String,
    pub value: String,
}

impl CredentialAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Ordered attribute names with their base values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTemplate {
    attributes: Vec<CredentialAttribute>,
}

impl AttributeTemplate {
    /// Build a template from attribute names; base values are `value_1`, `value_2`, ...
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| CredentialAttribute::new(name, format!("value_{}", i + 1)))
            .collect();
        Self { attributes }
    }

    /// The 19-attribute registration credential template.
    pub fn registration() -> Self {
        Self::from_names(REGISTRATION_ATTRIBUTES)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

/// Identifiers needed to address an offer, as discovered on the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferContext {
    pub schema_id: String,
    pub schema_name: String,
    pub schema_version: String,
    pub cred_def_id: String,
    pub connection_id: String,
    pub issuer_did: String,
}

impl OfferContext {
    /// Build a context, deriving the issuer DID from the credential definition id
    /// (`<did>:3:CL:<seq>:<tag>`).
    pub fn new(
        schema_id: impl Into<String>,
        schema_name: impl Into<String>,
        schema_version: impl Into<String>,
        cred_def_id: impl Into<String>,
        connection_id: impl Into<String>,
    ) -> Self {
        let cred_def_id = cred_def_id.into();
        let issuer_did = cred_def_id.split(':').next().unwrap_or_default().to_string();
        Self {
            schema_id: schema_id.into(),
            schema_name: schema_name.into(),
            schema_version: schema_version.into(),
            cred_def_id,
            connection_id: connection_id.into(),
            issuer_did,
        }
    }
}

/// The attribute preview embedded in an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPreview {
    #[serde(rename = "@type")]
    pub message_type: String,
    pub attributes: Vec<CredentialAttribute>,
}

/// A single credential offer, serialized as the `/issue-credential/send` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialOffer {
    pub schema_issuer_did: String,
    pub issuer_did: String,
    pub schema_name: String,
    pub schema_version: String,
    pub schema_id: String,
    pub cred_def_id: String,
    pub connection_id: String,
    pub credential_proposal: CredentialPreview,
}

impl CredentialOffer {
    pub fn attributes(&self) -> &[CredentialAttribute] {
        &self.credential_proposal.attributes
    }
}

/// Builds fresh, randomized offers for one schema and connection.
#[derive(Debug, Clone)]
pub struct OfferFactory {
    context: OfferContext,
    template: AttributeTemplate,
}

impl OfferFactory {
    pub fn new(context: OfferContext, template: AttributeTemplate) -> Self {
        Self { context, template }
    }

    pub fn context(&self) -> &OfferContext {
        &self.context
    }

    pub fn template(&self) -> &AttributeTemplate {
        &self.template
    }

    /// Build a new offer, suffixing every template value with a random number.
    pub fn build<R: Rng>(&self, rng: &mut R) -> CredentialOffer {
        let attributes = self
            .template
            .attributes
            .iter()
            .map(|a| {
                let suffix = rng.gen_range(SUFFIX_RANGE);
                CredentialAttribute::new(a.name.clone(), format!("{}_{suffix}", a.value))
            })
            .collect();

        let ctx = &self.context;
        CredentialOffer {
            schema_issuer_did: ctx.issuer_did.clone(),
            issuer_did: ctx.issuer_did.clone(),
            schema_name: ctx.schema_name.clone(),
            schema_version: ctx.schema_version.clone(),
            schema_id: ctx.schema_id.clone(),
            cred_def_id: ctx.cred_def_id.clone(),
            connection_id: ctx.connection_id.clone(),
            credential_proposal: CredentialPreview {
                message_type: CREDENTIAL_PREVIEW_TYPE.to_string(),
                attributes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context() -> OfferContext {
        OfferContext::new(
            "6qnvgJtqwK44D8LFYnV5Yf:2:registration.registries.ca:1.0.42",
            REGISTRATION_SCHEMA_NAME,
            REGISTRATION_SCHEMA_VERSION,
            "6qnvgJtqwK44D8LFYnV5Yf:3:CL:42:default",
            "conn-1",
        )
    }

    #[test]
    fn issuer_did_from_cred_def() {
        assert_eq!(context().issuer_did, "6qnvgJtqwK44D8LFYnV5Yf");
    }

    #[test]
    fn registration_template_order() {
        let t = AttributeTemplate::registration();
        assert_eq!(t.len(), 19);
        assert_eq!(t.names().next(), Some("registration_id"));
        assert_eq!(t.names().last(), Some("expiry_date"));
    }

    #[test]
    fn every_attribute_is_randomized() {
        let factory = OfferFactory::new(context(), AttributeTemplate::registration());
        let mut rng = StdRng::seed_from_u64(7);
        let offer = factory.build(&mut rng);

        assert_eq!(offer.attributes().len(), 19);
        for (i, attr) in offer.attributes().iter().enumerate() {
            let prefix = format!("value_{}_", i + 1);
            let suffix = attr.value.strip_prefix(&prefix).unwrap();
            let n: u32 = suffix.parse().unwrap();
            assert!(SUFFIX_RANGE.contains(&n), "{} out of range", attr.value);
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let factory = OfferFactory::new(context(), AttributeTemplate::registration());
        let a = factory.build(&mut StdRng::seed_from_u64(1));
        let b = factory.build(&mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);

        let mut rng = StdRng::seed_from_u64(1);
        let first = factory.build(&mut rng);
        let second = factory.build(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn offer_wire_shape() {
        let factory = OfferFactory::new(context(), AttributeTemplate::from_names(["entity_name"]));
        let offer = factory.build(&mut StdRng::seed_from_u64(3));
        let json = serde_json::to_value(&offer).unwrap();

        assert_eq!(json["connection_id"], "conn-1");
        assert_eq!(json["schema_issuer_did"], "6qnvgJtqwK44D8LFYnV5Yf");
        assert_eq!(json["credential_proposal"]["@type"], CREDENTIAL_PREVIEW_TYPE);
        assert_eq!(json["credential_proposal"]["attributes"][0]["name"], "entity_name");
    }
}
