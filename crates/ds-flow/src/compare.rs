//! Comparing two photos that are already stored.

use ds_analysis::{AnalysisPipeline, ComparisonPair, VisionModel};
use ds_core::{AnalysisResult, Period, Sector, StorageLayout};
use ds_storage::{Baseline, BaselineResolver, Catalog, ImageStore};

use crate::error::{FlowError, FlowNotice};

/// Picks a sector and two periods, then optionally analyzes the pair.
///
/// The earlier period is always the "before" image, sent first.
pub struct CompareFlow<S, M> {
    store: S,
    layout: StorageLayout,
    pipeline: AnalysisPipeline<M>,
    sector: Option<Sector>,
    before: Option<Baseline>,
    after: Option<Baseline>,
    result: Option<AnalysisResult>,
    notice: Option<FlowNotice>,
}

impl<S, M> std::fmt::Debug for CompareFlow<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareFlow")
            .field("sector", &self.sector)
            .field("before", &self.before)
            .field("after", &self.after)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl<S: ImageStore, M: VisionModel> CompareFlow<S, M> {
    pub const fn new(store: S, layout: StorageLayout, pipeline: AnalysisPipeline<M>) -> Self {
        Self {
            store,
            layout,
            pipeline,
            sector: None,
            before: None,
            after: None,
            result: None,
            notice: None,
        }
    }

    pub const fn before(&self) -> Option<&Baseline> {
        self.before.as_ref()
    }

    pub const fn after(&self) -> Option<&Baseline> {
        self.after.as_ref()
    }

    pub const fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub const fn notice(&self) -> Option<&FlowNotice> {
        self.notice.as_ref()
    }

    /// The two most recent stored periods as (before, after).
    ///
    /// # Errors
    ///
    /// Storage transport failures.
    pub async fn default_periods(&self) -> Result<Option<(Period, Period)>, FlowError> {
        Ok(Catalog::new(&self.store, &self.layout).latest_pair().await?)
    }

    /// Load both photos of `sector`. The periods may be given in either order.
    ///
    /// # Errors
    ///
    /// Storage transport failures. A missing photo is not an error; it makes
    /// analysis unavailable.
    pub async fn select(
        &mut self,
        sector: Sector,
        first: Period,
        second: Period,
    ) -> Result<(), FlowError> {
        let (early, late) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        self.result = None;
        let resolver = BaselineResolver::new(&self.store, &self.layout);
        let loaded = match resolver.resolve(&sector, early).await {
            Ok(before) => resolver.resolve(&sector, late).await.map(|after| (before, after)),
            Err(e) => Err(e),
        };
        let (before, after) = match loaded {
            Ok(pair) => pair,
            Err(e) => {
                self.before = None;
                self.after = None;
                return Err(self.fail(e.into()));
            }
        };

        tracing::info!(
            %sector,
            before = %early,
            after = %late,
            before_found = before.is_available(),
            after_found = after.is_available(),
            "comparison loaded"
        );
        self.sector = Some(sector);
        self.before = Some(before);
        self.after = Some(after);
        self.notice = None;
        Ok(())
    }

    pub fn can_analyze(&self) -> bool {
        self.before.as_ref().is_some_and(Baseline::is_available)
            && self.after.as_ref().is_some_and(Baseline::is_available)
    }

    /// Analyze the loaded pair.
    ///
    /// # Errors
    ///
    /// A missing photo or API key is rejected before any request; analysis
    /// failures are returned and recorded as the notice.
    pub async fn analyze(&mut self) -> Result<&AnalysisResult, FlowError> {
        let before = self
            .before
            .as_ref()
            .and_then(Baseline::image)
            .map(|image| image.bytes.clone());
        let after = self
            .after
            .as_ref()
            .and_then(Baseline::image)
            .map(|image| image.bytes.clone());

        let outcome = match ComparisonPair::from_parts(before, after) {
            Ok(pair) => self.pipeline.analyze(&pair).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(result) => {
                self.notice = None;
                Ok(&*self.result.insert(result))
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        tracing::warn!(kind = %error.kind(), error = %error, "compare action failed");
        self.notice = Some(FlowNotice::from(&error));
        error
    }
}
