use ndarray::{array, stack, Array, Axis};
use crate::nn::layers::filtering::convolution::ConvolutionConfig;
use crate::utils::{Array1F, Array4F};

pub fn get_inputs() -> Array4F {
    let inputs = array![
            [
                [0.22537, 0.51686, 0.5185, 0.60037, 0.53262],
                [0.01331, 0.5241, 0.89588, 0.7699, 0.12285],
                [0.29587, 0.61202, 0.72614, 0.4635, 0.76911],
                [0.19163, 0.55787, 0.55078, 0.47223, 0.79188],
                [0.11525, 0.6813, 0.36233, 0.34421, 0.44952]
            ],
            [
                [0.02694, 0.41525, 0.92223, 0.09121, 0.31512],
                [0.52802, 0.32806, 0.44892, 0.01633, 0.09703],
                [0.69259, 0.83594, 0.42432, 0.84877, 0.54679],
                [0.3541, 0.72725, 0.09385, 0.89286, 0.33626],
                [0.89183, 0.29685, 0.30165, 0.80624, 0.83761]
            ]
        ];
    stack![Axis(0), inputs]
}

pub fn get_kernels() -> Array4F {
    stack![
            Axis(0),
            array![
                [[-0.2341, -0.41141], [-0.03269, -0.35668]],
                [[0.45318, 0.38312], [0.41303, -0.66184]]
            ],
            array![
                [[-0.87622, 0.50122], [0.2724, 0.94758]],
                [[-0.38468, -0.70155], [-0.31623, -0.27944]]
            ],
            array![
                [[-0.61662, -0.21975], [0.45739, 0.13252]],
                [[-0.69169, 0.34276], [0.22805, -0.23069]]
            ]
        ]
}

pub fn get_biases() -> Array1F {
    array![0.1, -0.2, 0.05]
}

pub fn get_config() -> ConvolutionConfig {
    ConvolutionConfig::new(1, 0).unwrap()
}

pub fn get_forward_result() -> Array4F {
    let result = array![
            [
                [-0.180507, -0.191095, 0.055217, -0.224068],
                [-0.248927, -0.285176, -0.792324, -0.386999],
                [-0.127236, 0.222955, -0.481811, 0.117550],
                [0.189833, -0.120206, -0.382243, -0.195832]
            ],
            [
                [-0.198492, -0.437235, 0.054900, -0.421403],
                [-0.174322, -0.179463, -0.517605, -0.453531],
                [-0.739743, -0.573891, -1.044296, -0.428049],
                [-0.422707, -0.407597, -1.004223, -0.765540]
            ],
            [
                [0.041426, -0.024074, -0.397880, -0.042557],
                [-0.144623, -0.074175, -0.682004, -0.048424],
                [-0.384900, -0.447372, -0.372250, -0.357505],
                [0.091492, -0.528146, -0.058132, -0.709885]
            ]
        ];
    stack![Axis(0), result]
}

/// Inputs' gradient when the upstream gradient is `forward result * -2`.
pub fn get_backward_result() -> Array4F {
    let result = array![
            [
                [-0.381270, -0.816731, -0.098136, -1.080343, 0.219359],
                [-0.541951, -0.148967, -1.170093, -1.173849, 0.764989],
                [-1.619606, -0.647241, -0.942190, 0.213382, 0.964970],
                [0.207735, 1.347906, 0.310258, 0.659886, 1.284108],
                [0.159007, 1.609605, 1.401979, 2.699544, 1.499270]
            ],
            [
                [0.068201, -0.365084, -1.008784, 0.127479, -0.390406],
                [-0.103891, -0.375375, -0.943843, 0.141411, -0.858363],
                [-0.824931, -2.276827, -1.424887, -3.369109, -1.233663],
                [-0.557904, -2.839066, -0.949026, -4.067723, -0.686010],
                [-0.465888, 0.139645, -0.923450, -1.092655, -1.014590]
            ]
        ];
    stack![Axis(0), result]
}

pub fn get_kernels_grad() -> Array4F {
    stack![
            Axis(0),
            array![
                [[3.872315, 3.333687], [3.208561, 2.983151]],
                [[1.756143, 2.427458], [2.350175, 4.586868]]
            ],
            array![
                [[8.308659, 8.901216], [6.895071, 8.034627]],
                [[7.175568, 8.571365], [7.366842, 9.156126]]
            ],
            array![
                [[4.784148, 5.526505], [4.638049, 4.390603]],
                [[5.760561, 2.895874], [4.277669, 4.627347]]
            ]
        ]
}

pub fn get_biases_grad() -> Array1F {
    array![6.061739, 15.426391, 8.278020]
}

/// Evenly spaced inputs `(2, 3, 4, 4)`, 2 filters `(3, 4, 4)`, stride 2 and padding 1.
pub fn get_linspace_case() -> (Array4F, Array4F, Array1F, ConvolutionConfig) {
    let inputs = Array::linspace(-0.1, 0.5, 2 * 3 * 4 * 4).into_shape((2, 3, 4, 4)).unwrap();
    let kernel = Array::linspace(-0.2, 0.3, 2 * 3 * 4 * 4).into_shape((2, 3, 4, 4)).unwrap();
    let biases = Array::linspace(-0.1, 0.2, 2);
    (inputs, kernel, biases, ConvolutionConfig::new(2, 1).unwrap())
}

pub fn get_linspace_forward_result() -> Array4F {
    stack![
        Axis(0),
        array![
            [[0.00770083, -0.00860388], [-0.06828809, -0.09177285]],
            [[0.53028255, 0.55705817], [0.62661496, 0.64621053]]
        ],
        array![
            [[-0.50926316, -0.5686482], [-0.75757341, -0.8241385]],
            [[2.08117452, 2.06486981], [2.0051856, 1.98170083]]
        ]
    ]
}
