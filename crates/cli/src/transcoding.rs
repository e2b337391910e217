//! Built-in transcoding table for breakdown-assistance sessions.
//!
//! Labels are the ones rule authors use in the catalog spreadsheet; paths
//! point into the session document as exported by the dialogue platform.

use ceh_eval::TranscodingTable;

const DOCUMENT: &str = "_embedded.documents[0].content";

const ENTRIES: &[(&str, &str)] = &[
    ("à la maison", "collectedData.location.isAtHome"),
    ("autoroute", "collectedData.location.isOnMotorway"),
    ("type d'incident véhicule", "botDialogSlot.breakdown_vs_accident"),
    ("effet client véhicule", "botDialogSlot.breakdown_generator_fact"),
    ("contexte final", "botDialogSlot.final_context"),
    ("assureur", "botDialogSlot.assureur"),
    ("benef insultant", "collectedData.requestSentiment.isInsult"),
    (
        "nom de la rue",
        "collectedData.requestGeneralInformation.address.road",
    ),
    (
        "ville",
        "collectedData.requestGeneralInformation.address.city",
    ),
    (
        "departement",
        "collectedData.requestGeneralInformation.address.department",
    ),
    ("type de demande", "collectedData.request.requestType"),
    (
        "is abuser",
        "collectedData.requestGeneralInformation.isAbuser",
    ),
    ("intent", "callbotPathData.conversation.mainIntent"),
];

pub fn builtin() -> TranscodingTable {
    ENTRIES
        .iter()
        .map(|(label, suffix)| (*label, format!("{}.{}", DOCUMENT, suffix)))
        .collect()
}
