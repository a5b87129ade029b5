//! In-process prediction over a catalog.

use subst_common::{Error, PredictionReply, PredictionResponse, ProductId, Result};
use subst_config::ScoringParams;
use subst_math::softmax_percent;

use crate::logging::event_names;

use super::catalog::Catalog;
use super::scoring::attribute_confidence;
use super::PredictionSource;

/// Failure message for codes missing from the catalog.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Scores substitutes from catalog attributes, answering in the same shape
/// as the prediction service.
#[derive(Debug, Clone)]
pub struct LocalPredictor {
    catalog: Catalog,
    params: ScoringParams,
}

impl LocalPredictor {
    pub fn new(catalog: Catalog, params: ScoringParams) -> Self {
        LocalPredictor { catalog, params }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Score every candidate for `product`.
    ///
    /// Substitutes are listed in catalog order. Probabilities are a tempered
    /// softmax over the confidences, in percent.
    pub fn score(&self, product: &ProductId) -> Result<PredictionResponse> {
        let base = self.catalog.require(product)?;
        let candidates = self.catalog.candidates(product)?;

        let confidences: Vec<f64> = candidates
            .iter()
            .map(|c| attribute_confidence(base, c, &self.params))
            .collect();
        let probabilities = softmax_percent(&confidences, self.params.temperature);

        let mut response = PredictionResponse::new(base.code.clone());
        for ((candidate, confidence), probability) in
            candidates.iter().zip(confidences).zip(probabilities)
        {
            response.push(candidate.code.clone(), confidence, probability);
        }

        tracing::debug!(
            target: event_names::PREDICT_SCORED,
            product = %product,
            candidates = response.substitutes.len(),
            "scored substitutes"
        );
        Ok(response)
    }
}

impl PredictionSource for LocalPredictor {
    fn fetch(&self, product: &ProductId) -> Result<PredictionReply> {
        match self.score(product) {
            Ok(response) => Ok(PredictionReply::Success(response)),
            Err(Error::ProductNotFound { .. }) => Ok(PredictionReply::failure(PRODUCT_NOT_FOUND)),
            Err(e) => Err(e),
        }
    }
}
