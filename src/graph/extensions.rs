use crate::graph::{
    amplify::{Amplify, Gain},
    mix::Mix,
    modulate::Modulate,
    node::{GraphNode, Modulatable},
    through::Through,
};

/// Fluent combinators so voices read as signal flow:
///
/// ```
/// use stemseq::graph::{
///     envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
/// };
///
/// let _voice = OscNode::sawtooth()
///     .through(FilterNode::lowpass(900.0))
///     .amplify(EnvNode::adsr(0.01, 0.1, 0.7, 0.2))
///     .gain(0.5);
/// ```
pub trait NodeExt: GraphNode + Sized {
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    fn modulate<M: GraphNode>(self, modulator: M, param: Self::Param, depth: f32) -> Modulate<Self, M>
    where
        Self: Modulatable,
    {
        Modulate::new(self, modulator, param, depth)
    }

    fn mix<B: GraphNode>(self, other: B, balance: f32) -> Mix<Self, B> {
        Mix::new(self, other, balance)
    }

    fn gain(self, gain: f32) -> Gain<Self> {
        Gain::new(self, gain)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}
