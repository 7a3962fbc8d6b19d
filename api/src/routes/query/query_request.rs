use serde::{Deserialize, Serialize};

/// Request payload for /query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question.
    pub question: String,
}

/// Response payload for /query.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Final model answer (plain text).
    pub answer: String,
    /// Exactly the chunk texts the answer was grounded on, in retrieval
    /// rank order.
    pub context: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_from_minimal_json() {
        let req: QueryRequest = serde_json::from_str(r#"{"question":"What is X?"}"#).unwrap();
        assert_eq!(req.question, "What is X?");
    }

    #[test]
    fn response_serializes_answer_and_context() {
        let resp = QueryResponse {
            answer: "A.".into(),
            context: vec!["chunk".into()],
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["answer"], "A.");
        assert_eq!(v["context"][0], "chunk");
    }
}
