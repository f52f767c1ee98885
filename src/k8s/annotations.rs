use kube::ResourceExt;

pub trait AnnotationLookup {
    /// Value of the annotation `name`, if the object carries it.
    fn annotation(&self, name: &str) -> Option<&str>;
}

impl<R: ResourceExt> AnnotationLookup for R {
    fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations().get(name).map(String::as_str)
    }
}
