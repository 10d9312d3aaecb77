pub mod color {
    pub mod controlpoint;
    pub mod mappingerror;
    pub mod splinesegment;
    pub mod colorcurve;
    pub mod curvebuilder;
    pub mod palettemanager;
}

pub mod colormapper;

pub mod configuration;

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod splineerror;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod naturalcubicspline;
        }
    }
    pub mod round;
}

pub mod transform {
    pub mod inputtransformer;
    pub mod outputtransformer;
}
