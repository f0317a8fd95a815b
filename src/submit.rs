//! Write-side canonical record types.
//!
//! Every producer goes through these, so new documents always carry the
//! field names the normalizer tries first. The per-screen ad-hoc naming
//! that created the legacy fallback chains stops here. Urgent requests are
//! written to their own collection only; there is no mirror copy in the
//! donations collection.

use chrono::Utc;
use std::collections::HashMap;

use crate::error::Error;
use crate::feed::{Coordinates, Kind};
use crate::store::{CollectionClient, FieldValue};
use crate::validate;

/// Initial status written on creation
const STATUS_PENDING: &str = "pending";

/// A new standing donation, ready for validation and submission
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_id: String,
    pub donor_name: String,
    pub phone: String,
    pub item_name: String,
    pub description: String,
    pub quantity: f64,
    pub kind: Kind,
    pub coordinates: Coordinates,
    pub image_url: Option<String>,
}

impl NewDonation {
    /// Run the form checks, mirroring what the submission screens enforced
    pub fn validate(&self) -> Result<(), Error> {
        validate::validate_name(&self.donor_name)?;
        validate::validate_item(&self.item_name)?;
        validate::validate_phone(&self.phone)?;
        validate::validate_quantity_value(self.quantity)?;
        validate::validate_location(
            self.coordinates.latitude(),
            self.coordinates.longitude(),
        )?;
        Ok(())
    }

    fn fields(&self) -> HashMap<String, FieldValue> {
        let kind = match self.kind {
            Kind::Food => "food",
            Kind::Clothes => "clothes",
            Kind::Urgent => "urgent_request",
            Kind::Other => "other",
        };

        let mut fields = HashMap::new();
        fields.insert("itemName".to_string(), FieldValue::string(&self.item_name));
        fields.insert(
            "description".to_string(),
            FieldValue::string(&self.description),
        );
        fields.insert("quantity".to_string(), FieldValue::double(self.quantity));
        fields.insert("type".to_string(), FieldValue::string(kind));
        fields.insert("donorId".to_string(), FieldValue::string(&self.donor_id));
        fields.insert(
            "donorName".to_string(),
            FieldValue::string(&self.donor_name),
        );
        fields.insert("phone".to_string(), FieldValue::string(&self.phone));
        fields.insert(
            "location".to_string(),
            FieldValue::geo_point(self.coordinates.latitude(), self.coordinates.longitude()),
        );
        if let Some(image_url) = &self.image_url {
            fields.insert("imageUrl".to_string(), FieldValue::string(image_url));
        }
        fields.insert("status".to_string(), FieldValue::string(STATUS_PENDING));
        fields.insert("isReceived".to_string(), FieldValue::boolean(false));
        fields.insert("timestamp".to_string(), FieldValue::timestamp(Utc::now()));
        fields
    }
}

/// A new urgent request, ready for validation and submission
#[derive(Debug, Clone)]
pub struct NewUrgentRequest {
    pub requester_id: String,
    pub requester_name: String,
    pub requester_phone: String,
    pub item_name: String,
    pub description: Option<String>,
    /// People or items needed; textual to match what the forms collect
    pub quantity: String,
    pub delivery_address: String,
    pub coordinates: Option<Coordinates>,
}

impl NewUrgentRequest {
    /// Run the form checks
    pub fn validate(&self) -> Result<(), Error> {
        validate::validate_name(&self.requester_name)?;
        validate::validate_item(&self.item_name)?;
        validate::validate_phone(&self.requester_phone)?;
        validate::validate_quantity(&self.quantity)?;
        Ok(())
    }

    fn fields(&self) -> HashMap<String, FieldValue> {
        let mut fields = HashMap::new();
        fields.insert("itemName".to_string(), FieldValue::string(&self.item_name));
        if let Some(description) = &self.description {
            fields.insert("description".to_string(), FieldValue::string(description));
        }
        fields.insert("quantity".to_string(), FieldValue::string(&self.quantity));
        fields.insert(
            "requesterId".to_string(),
            FieldValue::string(&self.requester_id),
        );
        fields.insert(
            "requesterName".to_string(),
            FieldValue::string(&self.requester_name),
        );
        fields.insert(
            "requesterPhone".to_string(),
            FieldValue::string(&self.requester_phone),
        );
        fields.insert(
            "deliveryAddress".to_string(),
            FieldValue::string(&self.delivery_address),
        );
        if let Some(coords) = self.coordinates {
            fields.insert(
                "location".to_string(),
                FieldValue::geo_point(coords.latitude(), coords.longitude()),
            );
        }
        fields.insert("type".to_string(), FieldValue::string("urgent_request"));
        fields.insert("status".to_string(), FieldValue::string(STATUS_PENDING));
        fields.insert("isReceived".to_string(), FieldValue::boolean(false));
        fields.insert("timestamp".to_string(), FieldValue::timestamp(Utc::now()));
        fields
    }
}

/// Creates new records in the store
#[derive(Debug, Clone)]
pub struct SubmitService {
    donations: CollectionClient,
    urgent: CollectionClient,
}

impl SubmitService {
    pub(crate) fn new(donations: CollectionClient, urgent: CollectionClient) -> Self {
        Self { donations, urgent }
    }

    /// Validate and create a donation; returns the store-assigned id
    pub async fn submit_donation(&self, donation: &NewDonation) -> Result<String, Error> {
        donation.validate()?;
        let created = self.donations.create(donation.fields()).await?;
        Ok(created.id().to_string())
    }

    /// Validate and create an urgent request; returns the store-assigned id
    pub async fn submit_urgent_request(
        &self,
        request: &NewUrgentRequest,
    ) -> Result<String, Error> {
        request.validate()?;
        let created = self.urgent.create(request.fields()).await?;
        Ok(created.id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation() -> NewDonation {
        NewDonation {
            donor_id: "u1".to_string(),
            donor_name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            item_name: "Rice".to_string(),
            description: "5kg bag".to_string(),
            quantity: 5.0,
            kind: Kind::Food,
            coordinates: Coordinates::new(28.6, 77.2).unwrap(),
            image_url: None,
        }
    }

    #[test]
    fn valid_donation_passes_and_writes_canonical_fields() {
        let d = donation();
        assert!(d.validate().is_ok());

        let fields = d.fields();
        assert_eq!(fields.get("itemName"), Some(&FieldValue::string("Rice")));
        assert_eq!(fields.get("type"), Some(&FieldValue::string("food")));
        assert_eq!(fields.get("donorId"), Some(&FieldValue::string("u1")));
        assert_eq!(
            fields.get("isReceived"),
            Some(&FieldValue::boolean(false))
        );
        assert_eq!(
            fields.get("location"),
            Some(&FieldValue::geo_point(28.6, 77.2))
        );
        // legacy aliases are never written
        assert!(!fields.contains_key("foodName"));
        assert!(!fields.contains_key("name"));
        assert!(!fields.contains_key("userId"));
    }

    #[test]
    fn invalid_donation_rejected_before_any_write() {
        let mut d = donation();
        d.phone = "12345".to_string();
        assert!(matches!(d.validate(), Err(Error::Validation(_))));

        let mut d = donation();
        d.quantity = 0.0;
        assert!(matches!(d.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn urgent_request_writes_pending_status() {
        let r = NewUrgentRequest {
            requester_id: "u2".to_string(),
            requester_name: "Ravi".to_string(),
            requester_phone: "8765432109".to_string(),
            item_name: "Bread".to_string(),
            description: None,
            quantity: "12".to_string(),
            delivery_address: "12 Main St".to_string(),
            coordinates: None,
        };
        assert!(r.validate().is_ok());

        let fields = r.fields();
        assert_eq!(fields.get("status"), Some(&FieldValue::string("pending")));
        assert_eq!(
            fields.get("type"),
            Some(&FieldValue::string("urgent_request"))
        );
        assert!(!fields.contains_key("location"));
        assert!(!fields.contains_key("description"));
    }
}
