use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub owner_id: String,
    pub user_name: String,
}

/// An evaluation submission as returned by `/evaluation/submission/{id}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub entity_id: Option<String>,
    /// The submitted entity bundle, JSON-encoded as a string.
    #[serde(rename = "entityBundleJSON")]
    pub entity_bundle_json: Option<String>,
}

impl Submission {
    pub fn entity_bundle(&self) -> Result<Option<EntityBundle>, serde_json::Error> {
        self.entity_bundle_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBundle {
    pub entity: Entity,
    #[serde(default)]
    pub file_handles: Vec<FileHandle>,
}

impl EntityBundle {
    pub fn file_handle(&self, id: &str) -> Option<&FileHandle> {
        self.file_handles.iter().find(|handle| handle.id == id)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub concrete_type: Option<String>,
    pub data_file_handle_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub id: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission_with_bundle(bundle: serde_json::Value) -> Submission {
        serde_json::from_value(json!({
            "id": "9700001",
            "userId": "3345678",
            "evaluationId": "9614000",
            "entityId": "syn1234567",
            "versionNumber": 2,
            "name": "round 1",
            "createdOn": "2018-07-12T17:01:02.000Z",
            "entityBundleJSON": bundle.to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn decodes_file_entity_bundle() {
        let submission = submission_with_bundle(json!({
            "entity": {
                "concreteType": "org.sagebionetworks.repo.model.FileEntity",
                "name": "predictions.csv",
                "dataFileHandleId": "55501"
            },
            "fileHandles": [
                {"id": "55500", "fileName": "preview.png"},
                {"id": "55501", "fileName": "predictions.csv"}
            ]
        }));

        assert_eq!(submission.entity_id.as_deref(), Some("syn1234567"));
        let bundle = submission.entity_bundle().unwrap().unwrap();
        assert_eq!(bundle.entity.data_file_handle_id.as_deref(), Some("55501"));
        assert_eq!(bundle.file_handle("55501").unwrap().file_name, "predictions.csv");
        assert!(bundle.file_handle("1").is_none());
    }

    #[test]
    fn docker_bundle_has_no_file_handle() {
        let submission = submission_with_bundle(json!({
            "entity": {
                "concreteType": "org.sagebionetworks.repo.model.docker.DockerRepository",
                "name": "docker.synapse.org/syn1234567/model"
            }
        }));

        let bundle = submission.entity_bundle().unwrap().unwrap();
        assert!(bundle.entity.data_file_handle_id.is_none());
        assert!(bundle.file_handles.is_empty());
    }

    #[test]
    fn missing_bundle_is_none() {
        let submission: Submission = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert!(submission.entity_bundle().unwrap().is_none());
    }

    #[test]
    fn garbled_bundle_is_an_error() {
        let submission: Submission =
            serde_json::from_value(json!({"id": "1", "entityBundleJSON": "{not json"})).unwrap();
        assert!(submission.entity_bundle().is_err());
    }
}
