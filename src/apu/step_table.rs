// Band-limited step kernel.
//
// Row `p` holds the response, over `STEP_WIDTH` output samples, of a unit
// step that happens `p / PHASES` of a sample after the first sample of the
// row. Every row sums to one, so once a step has been fully added the
// running sum of the buffer has moved by exactly the step's amplitude.
// The extra last row is the first row shifted one sample to the right,
// which lets the mixer interpolate between row `p` and `p + 1` for any
// phase.
//
// The values are a windowed sinc sampled at 32 phases, the same kernel
// blip_buf uses, normalised to floats.

pub const PHASES: usize = 32;

// Width of a step, in samples. Must be even.
pub const STEP_WIDTH: usize = 16;

#[rustfmt::skip]
pub const STEP_TABLE: [[f32; STEP_WIDTH]; PHASES + 1] = [
    [ 0.001312256, -0.003509521,  0.010681152, -0.014892578,  0.034667969, -0.027893066,  0.178863525,  0.641540527,  0.178863525, -0.027893066,  0.034667969, -0.014892578,  0.010681152, -0.003509521,  0.001312256,  0.000000000],
    [ 0.001342773, -0.003601074,  0.010620117, -0.014434814,  0.032836914, -0.024383545,  0.160949707,  0.640899658,  0.197265625, -0.031158447,  0.036315918, -0.015228271,  0.010681152, -0.003356934,  0.001220703,  0.000030518],
    [ 0.001373291, -0.003692627,  0.010498047, -0.013854980,  0.030853271, -0.020660400,  0.143615723,  0.638916016,  0.216125488, -0.034149170,  0.037780762, -0.015441895,  0.010589600, -0.003112793,  0.001068115,  0.000091553],
    [ 0.001403809, -0.003723145,  0.010253906, -0.013153076,  0.028747559, -0.016754150,  0.126831055,  0.635650635,  0.235382080, -0.036773682,  0.039001465, -0.015472412,  0.010406494, -0.002868652,  0.000946045,  0.000122070],
    [ 0.001434326, -0.003753662,  0.009979248, -0.012329102,  0.026489258, -0.012756348,  0.110748291,  0.631072998,  0.254974365, -0.039062500,  0.040039063, -0.015380859,  0.010162354, -0.002593994,  0.000793457,  0.000183105],
    [ 0.001434326, -0.003723145,  0.009643555, -0.011444092,  0.024169922, -0.008697510,  0.095336914,  0.625244141,  0.274810791, -0.040863037,  0.040802002, -0.015136719,  0.009826660, -0.002288818,  0.000671387,  0.000213623],
    [ 0.001434326, -0.003662109,  0.009246826, -0.010498047,  0.021789551, -0.004608154,  0.080688477,  0.618164063,  0.294799805, -0.042205811,  0.041320801, -0.014739990,  0.009429932, -0.001922607,  0.000488281,  0.000274658],
    [ 0.001403809, -0.003570557,  0.008819580, -0.009460449,  0.019348145, -0.000518799,  0.066772461,  0.609893799,  0.314910889, -0.043029785,  0.041564941, -0.014160156,  0.008911133, -0.001495361,  0.000274658,  0.000335693],
    [ 0.001403809, -0.003479004,  0.008331299, -0.008392334,  0.016876221,  0.003570557,  0.053649902,  0.600433350,  0.335052490, -0.043304443,  0.041534424, -0.013397217,  0.008300781, -0.001068115,  0.000091553,  0.000396729],
    [ 0.001342773, -0.003295898,  0.007781982, -0.007232666,  0.014373779,  0.007537842,  0.041381836,  0.589813232,  0.355163574, -0.042968750,  0.041229248, -0.012512207,  0.007629395, -0.000579834, -0.000122070,  0.000457764],
    [ 0.001312256, -0.003143311,  0.007232666, -0.006072998,  0.011901855,  0.011383057,  0.029937744,  0.578125000,  0.375152588, -0.041992188,  0.040618896, -0.011444092,  0.006896973, -0.000091553, -0.000366211,  0.000549316],
    [ 0.001281738, -0.002990723,  0.006652832, -0.004882813,  0.009460449,  0.015106201,  0.019317627,  0.565399170,  0.394958496, -0.040344238,  0.039703369, -0.010223389,  0.006072998,  0.000488281, -0.000610352,  0.000610352],
    [ 0.001220703, -0.002777100,  0.006042480, -0.003692627,  0.007049561,  0.018646240,  0.009582520,  0.551696777,  0.414489746, -0.037963867,  0.038482666, -0.008850098,  0.005187988,  0.001037598, -0.000823975,  0.000671387],
    [ 0.001159668, -0.002563477,  0.005432129, -0.002471924,  0.004669189,  0.022033691,  0.000671387,  0.537078857,  0.433654785, -0.034851074,  0.036956787, -0.007293701,  0.004241943,  0.001617432, -0.001098633,  0.000762939],
    [ 0.001098633, -0.002319336,  0.004791260, -0.001312256,  0.002441406,  0.025146484, -0.007354736,  0.521606445,  0.452392578, -0.030975342,  0.035156250, -0.005615234,  0.003234863,  0.002227783, -0.001342773,  0.000823975],
    [ 0.001037598, -0.002075195,  0.004119873, -0.000091553,  0.000244141,  0.028045654, -0.014526367,  0.505310059,  0.470642090, -0.026306152,  0.033050537, -0.003753662,  0.002136230,  0.002868652, -0.001586914,  0.000885010],
    [ 0.000976563, -0.001861572,  0.003509521,  0.001037598, -0.001831055,  0.030700684, -0.020843506,  0.488311768,  0.488311768, -0.020843506,  0.030700684, -0.001831055,  0.001037598,  0.003509521, -0.001861572,  0.000976563],
    [ 0.000885010, -0.001586914,  0.002868652,  0.002136230, -0.003753662,  0.033050537, -0.026306152,  0.470642090,  0.505310059, -0.014526367,  0.028045654,  0.000244141, -0.000091553,  0.004119873, -0.002075195,  0.001037598],
    [ 0.000823975, -0.001342773,  0.002227783,  0.003234863, -0.005615234,  0.035156250, -0.030975342,  0.452392578,  0.521606445, -0.007354736,  0.025146484,  0.002441406, -0.001312256,  0.004791260, -0.002319336,  0.001098633],
    [ 0.000762939, -0.001098633,  0.001617432,  0.004241943, -0.007293701,  0.036956787, -0.034851074,  0.433654785,  0.537078857,  0.000671387,  0.022033691,  0.004669189, -0.002471924,  0.005432129, -0.002563477,  0.001159668],
    [ 0.000671387, -0.000823975,  0.001037598,  0.005187988, -0.008850098,  0.038482666, -0.037963867,  0.414489746,  0.551696777,  0.009582520,  0.018646240,  0.007049561, -0.003692627,  0.006042480, -0.002777100,  0.001220703],
    [ 0.000610352, -0.000610352,  0.000488281,  0.006072998, -0.010223389,  0.039703369, -0.040344238,  0.394958496,  0.565399170,  0.019317627,  0.015106201,  0.009460449, -0.004882813,  0.006652832, -0.002990723,  0.001281738],
    [ 0.000549316, -0.000366211, -0.000091553,  0.006896973, -0.011444092,  0.040618896, -0.041992188,  0.375152588,  0.578125000,  0.029937744,  0.011383057,  0.011901855, -0.006072998,  0.007232666, -0.003143311,  0.001312256],
    [ 0.000457764, -0.000122070, -0.000579834,  0.007629395, -0.012512207,  0.041229248, -0.042968750,  0.355163574,  0.589813232,  0.041381836,  0.007537842,  0.014373779, -0.007232666,  0.007781982, -0.003295898,  0.001342773],
    [ 0.000396729,  0.000091553, -0.001068115,  0.008300781, -0.013397217,  0.041534424, -0.043304443,  0.335052490,  0.600433350,  0.053649902,  0.003570557,  0.016876221, -0.008392334,  0.008331299, -0.003479004,  0.001403809],
    [ 0.000335693,  0.000274658, -0.001495361,  0.008911133, -0.014160156,  0.041564941, -0.043029785,  0.314910889,  0.609893799,  0.066772461, -0.000518799,  0.019348145, -0.009460449,  0.008819580, -0.003570557,  0.001403809],
    [ 0.000274658,  0.000488281, -0.001922607,  0.009429932, -0.014739990,  0.041320801, -0.042205811,  0.294799805,  0.618164063,  0.080688477, -0.004608154,  0.021789551, -0.010498047,  0.009246826, -0.003662109,  0.001434326],
    [ 0.000213623,  0.000671387, -0.002288818,  0.009826660, -0.015136719,  0.040802002, -0.040863037,  0.274810791,  0.625244141,  0.095336914, -0.008697510,  0.024169922, -0.011444092,  0.009643555, -0.003723145,  0.001434326],
    [ 0.000183105,  0.000793457, -0.002593994,  0.010162354, -0.015380859,  0.040039063, -0.039062500,  0.254974365,  0.631072998,  0.110748291, -0.012756348,  0.026489258, -0.012329102,  0.009979248, -0.003753662,  0.001434326],
    [ 0.000122070,  0.000946045, -0.002868652,  0.010406494, -0.015472412,  0.039001465, -0.036773682,  0.235382080,  0.635650635,  0.126831055, -0.016754150,  0.028747559, -0.013153076,  0.010253906, -0.003723145,  0.001403809],
    [ 0.000091553,  0.001068115, -0.003112793,  0.010589600, -0.015441895,  0.037780762, -0.034149170,  0.216125488,  0.638916016,  0.143615723, -0.020660400,  0.030853271, -0.013854980,  0.010498047, -0.003692627,  0.001373291],
    [ 0.000030518,  0.001220703, -0.003356934,  0.010681152, -0.015228271,  0.036315918, -0.031158447,  0.197265625,  0.640899658,  0.160949707, -0.024383545,  0.032836914, -0.014434814,  0.010620117, -0.003601074,  0.001342773],
    [ 0.000000000,  0.001312256, -0.003509521,  0.010681152, -0.014892578,  0.034667969, -0.027893066,  0.178863525,  0.641540527,  0.178863525, -0.027893066,  0.034667969, -0.014892578,  0.010681152, -0.003509521,  0.001312256],
];
