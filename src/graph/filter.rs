use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

/// State-variable filter node. Cutoff and resonance are modulatable; the
/// base values set at construction stay fixed and modulation is applied on
/// top of them each block.
pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
    base_resonance: f32,
}

impl FilterNode {
    fn new(filter: SVFilter) -> Self {
        Self {
            base_cutoff: filter.cutoff(),
            base_resonance: filter.resonance(),
            filter,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::lowpass(cutoff_hz))
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::highpass(cutoff_hz))
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(SVFilter::bandpass(cutoff_hz))
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.base_resonance = resonance;
        self.filter.set_resonance(resonance);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Resonance => self.base_resonance,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let value = base + modulation;
        match param {
            // The SVF clamps against the sample rate on render.
            FilterParam::Cutoff => self.filter.set_cutoff(value.max(0.0)),
            FilterParam::Resonance => self.filter.set_resonance(value),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulation_keeps_base_cutoff() {
        let mut filter = FilterNode::lowpass(400.0).with_resonance(0.3);
        filter.apply_modulation(FilterParam::Cutoff, 400.0, 1_000.0);
        assert_eq!(filter.get_param(FilterParam::Cutoff), 400.0);
        assert_eq!(filter.cutoff(), 1_400.0);
        assert_eq!(filter.get_param(FilterParam::Resonance), 0.3);
    }
}
