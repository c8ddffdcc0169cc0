/// A function from an image handle `I` to its transformed representation `O`.
///
/// Closures `Fn(&I) -> anyhow::Result<O>` implement this trait.
pub trait Transform<I, O>
where
    Self: Send + Sync,
{
    fn transform(&self, image: &I) -> anyhow::Result<O>;
}

impl<I, O, F> Transform<I, O> for F
where
    F: Fn(&I) -> anyhow::Result<O> + Send + Sync,
{
    fn transform(&self, image: &I) -> anyhow::Result<O> {
        self(image)
    }
}

pub type BoxTransform<I, O> = Box<dyn Transform<I, O>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_transform() {
        let scale = |value: &u32| -> anyhow::Result<u64> { Ok(*value as u64 * 2) };
        let boxed: BoxTransform<u32, u64> = Box::new(scale);
        assert_eq!(boxed.transform(&21).unwrap(), 42);

        let failing = |_: &u32| -> anyhow::Result<u64> { anyhow::bail!("broken image") };
        assert!(Transform::<u32, u64>::transform(&failing, &0).is_err());
    }
}
